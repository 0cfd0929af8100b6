use anyhow::Result;
use clap::{Parser, Subcommand};
use rit::areas::repository::Repository;

#[derive(Parser)]
#[command(
    name = "rit",
    version = "0.1.0",
    author = "Andrei Morar",
    about = "A content-addressable version control store",
    long_about = "A small reimplementation of the git object model: \
    loose objects, the staging index, references and the three-way \
    status engine. Not a git replacement, but a faithful subset of its \
    on-disk formats.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Initialize a new repository")]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "cat-file", about = "Print the content of an object")]
    CatFile {
        #[arg(index = 1, help = "The expected object type")]
        kind: String,
        #[arg(index = 2, help = "The object to print")]
        object: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object type")]
        kind: String,
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "ls-tree", about = "List the contents of a tree object")]
    LsTree {
        #[arg(short, long, help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1, help = "The tree-ish object to list")]
        treeish: String,
    },
    #[command(name = "rev-parse", about = "Resolve a name to an object id")]
    RevParse {
        #[arg(short = 't', long = "type", help = "The expected object type")]
        kind: Option<String>,
        #[arg(index = 1, help = "The name to resolve")]
        name: String,
    },
    #[command(name = "show-ref", about = "List references")]
    ShowRef,
    #[command(name = "add", about = "Stage files for commit")]
    Add {
        #[arg(index = 1, required = true, help = "The files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(name = "rm", about = "Unstage files and remove them from the working tree")]
    Rm {
        #[arg(index = 1, required = true, help = "The files to remove")]
        paths: Vec<String>,
    },
    #[command(name = "commit", about = "Create a new commit with the staged changes")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the commit history")]
    Log {
        #[arg(index = 1, default_value = "HEAD", help = "The commit to start from")]
        object: String,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status {
        #[arg(long, help = "Machine-readable two-column output")]
        porcelain: bool,
    },
    #[command(name = "checkout", about = "Materialize a commit or tree into a directory")]
    Checkout {
        #[arg(index = 1, help = "The commit or tree to check out")]
        treeish: String,
        #[arg(index = 2, help = "The destination directory, empty or missing")]
        directory: String,
    },
    #[command(name = "tag", about = "List tags or create a new one")]
    Tag {
        #[arg(short, long, help = "Create an annotated tag object")]
        annotate: bool,
        #[arg(index = 1, help = "The tag name; omit to list tags")]
        name: Option<String>,
        #[arg(index = 2, default_value = "HEAD", help = "The object the tag points at")]
        object: String,
    },
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::find(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()))?,
                None => {
                    let pwd = std::env::current_dir()?;
                    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?
                }
            };

            repository.init()?
        }
        Commands::CatFile { kind, object } => open_repository()?.cat_file(kind, object)?,
        Commands::HashObject { kind, write, file } => {
            open_repository()?.hash_object(file, kind, *write)?
        }
        Commands::LsTree { recursive, treeish } => {
            open_repository()?.ls_tree(treeish, *recursive)?
        }
        Commands::RevParse { kind, name } => {
            open_repository()?.rev_parse(name, kind.as_deref())?
        }
        Commands::ShowRef => open_repository()?.show_ref()?,
        Commands::Add { paths } => open_repository()?.add(paths)?,
        Commands::Rm { paths } => open_repository()?.rm(paths)?,
        Commands::Commit { message } => open_repository()?.commit(message)?,
        Commands::Log { object } => open_repository()?.log(object)?,
        Commands::Status { porcelain } => open_repository()?.status(*porcelain)?,
        Commands::Checkout { treeish, directory } => {
            open_repository()?.checkout(treeish, directory)?
        }
        Commands::Tag {
            annotate,
            name,
            object,
        } => {
            let repository = open_repository()?;
            match name {
                Some(name) => repository.tag(name, object, *annotate)?,
                None => repository.list_tags()?,
            }
        }
    }

    Ok(())
}
