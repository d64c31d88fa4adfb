//! Positional `%s` template filling

/// Fill `%s` placeholders in `template` with `args`, in order.
///
/// `%%` produces a literal percent sign. Placeholders without a matching
/// argument are replaced by an empty string, and any other `%` sequence is
/// copied through unchanged.
pub fn fill(template: &str, args: &[&str]) -> String {
    let mut output = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            output.push(c);
            continue;
        }

        match chars.peek() {
            Some('s') => {
                chars.next();
                if let Some(arg) = args.next() {
                    output.push_str(arg);
                }
            }
            Some('%') => {
                chars.next();
                output.push('%');
            }
            _ => output.push('%'),
        }
    }

    output
}
