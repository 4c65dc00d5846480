fn main() {
    std::process::exit(app_registry::app::startup::startup());
}
