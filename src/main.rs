fn main() {
    pkman::run_cli();
}
