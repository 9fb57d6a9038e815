fn main() {
    env_logger::init();

    if let Err(error) = kittibox::run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
