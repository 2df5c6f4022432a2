use anyhow::Result;

use super::model::CreateCommand;
use crate::tfs::config::TfsutilConfig;

impl CreateCommand {
    pub fn run(&self) -> Result<()> {
        let created = chrono::Local::now().to_rfc3339();
        let contents = TfsutilConfig::template(&created);

        match &self.output {
            Some(path) => {
                TfsutilConfig::write_file(path, &contents, self.force)?;
                println!("✅ Config written to {}", path.display());
            }
            None => print!("{contents}"),
        }
        Ok(())
    }
}
