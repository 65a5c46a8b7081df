fn main() -> anyhow::Result<()> {
    briefly::cli::run()
}
