fn main() -> anyhow::Result<()> {
    tabwarden_lib::init_logging();
    tabwarden_lib::run()
}
