//! Message templating.
//!
//! Templates use `{}` for the next argument and `{N}` for an explicit
//! position; `{{` and `}}` are literal braces. A placeholder without a
//! matching argument is left in the output untouched.

/// Substitutes `args` into `template`.
pub fn render(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(String::len).sum::<usize>());
    let mut chars = template.chars().peekable();
    let mut next_implicit = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut inner = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                if !closed {
                    out.push('{');
                    out.push_str(&inner);
                    continue;
                }
                let index = if inner.is_empty() {
                    let index = next_implicit;
                    next_implicit += 1;
                    Some(index)
                } else {
                    inner.trim().parse::<usize>().ok()
                };
                match index.and_then(|i| args.get(i)) {
                    Some(arg) => out.push_str(arg),
                    None => {
                        out.push('{');
                        out.push_str(&inner);
                        out.push('}');
                    }
                }
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            other => out.push(other),
        }
    }

    out
}
