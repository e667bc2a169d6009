fn main() {
    if let Err(e) = beaker_sim::app::run() {
        eprintln!("beaker_sim: {}", e);
        std::process::exit(1);
    }
}
