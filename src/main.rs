fn main() {
    if let Err(err) = chargeback_report::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
