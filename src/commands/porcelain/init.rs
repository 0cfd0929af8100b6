use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DEFAULT_BRANCH: &str = "master";
const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";
const DEFAULT_CONFIG: &str = "[core]\n\
    \trepositoryformatversion = 0\n\
    \tfilemode = true\n\
    \tbare = false\n";

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create the objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create the refs/heads directory")?;

        fs::create_dir_all(self.refs().tags_path())
            .context("Failed to create the refs/tags directory")?;

        fs::create_dir_all(self.metadata_path().join("info"))
            .context("Failed to create the info directory")?;

        let head_path = self.refs().head_path();
        if !head_path.exists() {
            self.refs()
                .update_ref_file(&head_path, format!("ref: refs/heads/{DEFAULT_BRANCH}\n"))
                .context("Failed to create the initial HEAD reference")?;
        }

        let description_path = self.metadata_path().join("description");
        if !description_path.exists() {
            fs::write(&description_path, DEFAULT_DESCRIPTION)
                .context("Failed to write the description file")?;
        }

        let config_path = self.metadata_path().join("config");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .context("Failed to write the config file")?;
        }

        // create the index file if it does not exist
        let index = self.index();
        if !index.path().exists() {
            fs::write(index.path(), b"").context("Failed to create the index file")?;
        }

        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            self.metadata_path().display()
        )?;

        Ok(())
    }
}
