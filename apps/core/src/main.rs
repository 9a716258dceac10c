use clap::Parser;

fn main() {
    let args = match quickpurple_core::runtime::CliArgs::try_parse() {
        Ok(args) => args,
        Err(error) if !error.use_stderr() => {
            let _ = error.print();
            return;
        }
        Err(error) => {
            eprintln!("[quickpurple] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = quickpurple_core::runtime::run(args) {
        eprintln!("[quickpurple] runtime failed: {error}");
        std::process::exit(1);
    }
}
