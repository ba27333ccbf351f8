fn main() {
    if let Err(e) = tale_rust::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
