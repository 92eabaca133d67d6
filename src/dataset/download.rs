//! Acquisition of the census files from the UCI repository

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use super::error::DataError;

pub const CENSUS_URLS: [&str; 3] = [
    "https://archive.ics.uci.edu/ml/machine-learning-databases/adult/adult.data",
    "https://archive.ics.uci.edu/ml/machine-learning-databases/adult/adult.names",
    "https://archive.ics.uci.edu/ml/machine-learning-databases/adult/adult.test",
];

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// File name a URL is stored under (its last path segment)
pub fn file_name_for(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(CONNECT_TIMEOUT)
        .timeout_read(READ_TIMEOUT)
        .build()
}

/// Download every URL into `dir`, creating it if needed.
///
/// `on_file` is called after each completed file. A failed request is fatal;
/// nothing is retried.
pub fn download_dataset(
    dir: &Path,
    urls: &[&str],
    mut on_file: impl FnMut(&Path),
) -> Result<Vec<PathBuf>, DataError> {
    std::fs::create_dir_all(dir).map_err(|e| DataError::io(dir, e))?;

    let agent = agent();
    let mut written = Vec::with_capacity(urls.len());
    for url in urls {
        let dest = dir.join(file_name_for(url));
        fetch_to_file(&agent, url, &dest)?;
        on_file(&dest);
        written.push(dest);
    }

    info!(files = written.len(), dir = %dir.display(), "census dataset downloaded");
    Ok(written)
}

fn fetch_to_file(agent: &ureq::Agent, url: &str, dest: &Path) -> Result<(), DataError> {
    let download_error = |message: String| DataError::Download {
        url: url.to_string(),
        message,
    };

    let response = match agent.get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => return Err(download_error(format!("HTTP {code}"))),
        Err(err) => return Err(download_error(err.to_string())),
    };

    let tmp = dest.with_extension("tmp");
    let mut file = File::create(&tmp).map_err(|e| DataError::io(&tmp, e))?;
    let mut reader = response.into_reader();
    let bytes = std::io::copy(&mut reader, &mut file).map_err(|e| download_error(e.to_string()))?;
    file.flush().map_err(|e| DataError::io(&tmp, e))?;
    std::fs::rename(&tmp, dest).map_err(|e| DataError::io(dest, e))?;

    debug!(url, bytes, dest = %dest.display(), "downloaded file");
    Ok(())
}
