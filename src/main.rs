fn main() {
    env_logger::init();
    flatvyos::cli::cli();
}
