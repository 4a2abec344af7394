fn main() {
    if let Err(err) = appointment_cards::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
