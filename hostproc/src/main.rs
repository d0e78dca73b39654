fn main() {
    if let Err(e) = hostproc::run_cli() {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}
