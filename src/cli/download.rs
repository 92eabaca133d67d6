//! `download` subcommand

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::dataset::{download_dataset, file_name_for, CENSUS_URLS};
use crate::utils::{create_progress_bar, finish_with_success, print_info};

/// Fetch the census files into `data_dir`
pub fn run_download(data_dir: &Path) -> Result<()> {
    println!(
        "\n {} Downloading the census dataset",
        style("◆").cyan().bold()
    );
    println!("   Directory: {}", style(data_dir.display()).dim());
    println!();

    let pb = create_progress_bar(CENSUS_URLS.len() as u64, "Downloading");
    let files = download_dataset(data_dir, &CENSUS_URLS, |path| {
        if let Some(name) = path.file_name() {
            pb.set_message(name.to_string_lossy().to_string());
        }
        pb.inc(1);
    })
    .with_context(|| format!("Failed to download into {}", data_dir.display()))?;
    finish_with_success(&pb, &format!("Downloaded {} files", files.len()));

    for url in CENSUS_URLS {
        print_info(&format!("{} ← {}", file_name_for(url), style(url).dim()));
    }
    Ok(())
}
