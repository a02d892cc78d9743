use super::*;

/// Debugging aid: prints the code `#[generator]` expands to, formatted with
/// `rustfmt` when available, and highlighted with `bat`.
#[cfg(feature = "verbose-expansions")]
pub(in crate)
fn pretty_print_tokenstream (
    code: &'_ TokenStream2,
)
{
    use ::std::{
        io::{Read, Write},
        process::{Command, Stdio},
    };

    fn rustfmt (input: &'_ str)
      -> Option<String>
    {
        let mut child =
            Command::new("rustfmt")
                .args(["--edition", "2021"])
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::null())
                .spawn()
                .ok()?
        ;
        child.stdin.take()?.write_all(input.as_bytes()).ok()?;
        let mut formatted = String::new();
        child.stdout.take()?.read_to_string(&mut formatted).ok()?;
        child.wait().ok()?.success().then(|| formatted)
    }

    let code = code.to_string();
    let code = rustfmt(&code).unwrap_or(code);
    let highlighted =
        ::bat::PrettyPrinter::new()
            .input_from_bytes(code.as_bytes())
            .language("rust")
            .true_color(false)
            .snip(true)
            .print()
    ;
    if highlighted.is_err() {
        println!("{}", code);
    }
}
