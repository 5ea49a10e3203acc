fn main() -> anyhow::Result<()> {
    scour_version::build::generate()
}
