use std::io::Write;

use clap::Parser;
use ext2cat::cli_interface::Ext2Cli;
/// a CLI interface to read files out of an ext2 image without mounting it.
///
/// The image is only ever read: it is memory-mapped read-only and
/// every subcommand exits once its output is written.
fn main() -> anyhow::Result<()> {
    env_logger::builder().format_timestamp_nanos().init();
    let args = Ext2Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args {
        Ext2Cli::Resolve(args) => {
            let inode = ext2cat::resolve::resolve(args.image_file_path, &args.file_path)?;
            writeln!(out, "{inode}")?;
        }
        Ext2Cli::Cat(args) => {
            ext2cat::cat::cat(args.image_file_path, &args.file_path, &mut out)?;
        }
        Ext2Cli::Ls(args) => {
            ext2cat::ls::ls(args.image_file_path, &args.file_path, &mut out)?;
        }
        Ext2Cli::Info(args) => {
            ext2cat::info::info(args.image_file_path, &mut out)?;
        }
    }
    Ok(())
}
