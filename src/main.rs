fn main() {
    if let Err(e) = price_scan_lib::run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
