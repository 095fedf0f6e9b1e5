use anyhow::Result;

fn main() -> Result<()> {
    attrscan_cli::main_entry()
}
