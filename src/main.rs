fn main() {
    if let Err(err) = tikzfsm::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
