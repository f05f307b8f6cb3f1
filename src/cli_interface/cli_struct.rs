use clap::Parser;

#[derive(Parser, Debug, PartialEq)]
#[command(author, version, about, long_about)]
pub enum Ext2Cli {
    /// print the inode number of a path, 0 if it does not exist
    Resolve(PathArgs),
    /// print the contents of a file
    Cat(PathArgs),
    /// list the entries of a directory
    Ls(LsArgs),
    /// show the superblock and block group of an image
    Info(InfoArgs),
}

/// subcommands addressing one file inside the image
#[derive(clap::Args, Debug, PartialEq)]
pub struct PathArgs {
    /// the path of the file system image file
    #[clap(short = 'p', long)]
    pub image_file_path: String,
    /// the absolute path of the file inside the image
    #[clap(short, long)]
    pub file_path: String,
}

/// list a directory subcommand
#[derive(clap::Args, Debug, PartialEq)]
#[command(about = "list the entries of a directory")]
pub struct LsArgs {
    /// the path of the file system image file
    #[clap(short = 'p', long)]
    pub image_file_path: String,
    /// the absolute path of the directory inside the image
    #[clap(short, long, default_value = "/")]
    pub file_path: String,
}

/// show image information subcommand
#[derive(clap::Args, Debug, PartialEq)]
#[command(about = "show the superblock and block group of an image")]
pub struct InfoArgs {
    /// the path of the file system image file
    #[clap(short = 'p', long)]
    pub image_file_path: String,
}

/// test the `Ext2Cli` struct
/// test `resolve` and `cat` subcommands
#[cfg(test)]
mod path_parse_args_tests {
    use super::*;
    /// test short parameter form
    #[test]
    fn test_short_parameter_form() {
        let args = Ext2Cli::parse_from(["ext2cat", "resolve", "-p", "disk.img", "-f", "/a/b"]);
        assert_eq!(
            args,
            Ext2Cli::Resolve(PathArgs {
                image_file_path: "disk.img".to_string(),
                file_path: "/a/b".to_string(),
            })
        );
    }
    /// test long parameter form
    #[test]
    fn test_long_parameter_form() {
        let image_file_path_name = concat!("--", "image-file-path");
        let args = Ext2Cli::parse_from([
            "ext2cat",
            "cat",
            image_file_path_name,
            "disk.img",
            "--file-path",
            "/etc/hosts",
        ]);
        assert_eq!(
            args,
            Ext2Cli::Cat(PathArgs {
                image_file_path: "disk.img".to_string(),
                file_path: "/etc/hosts".to_string(),
            })
        );
    }
    /// the target path is required
    #[test]
    fn test_missing_file_path() {
        assert!(Ext2Cli::try_parse_from(["ext2cat", "cat", "-p", "disk.img"]).is_err());
    }
}
