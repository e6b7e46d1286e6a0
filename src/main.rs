fn main() -> anyhow::Result<()> {
    diarize_cluster::run()
}
