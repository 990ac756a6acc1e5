fn main() {
    if let Err(err) = fanchart_rs::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
