use clap::Parser;
use std::path::PathBuf;
use temperature_heatmap::config::{ENV_DATASET_URL, ENV_HEIGHT, ENV_OUTPUT, ENV_WIDTH};

#[derive(Debug, Parser)]
#[command(name = "heatmap", version, about = "Monthly global temperature heatmap")]
pub struct CliArgs {
    /// Print a dataset summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging (the viewer writes its log to heatmap.log in the temp directory)
    #[arg(long)]
    pub debug: bool,

    /// Override the dataset URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Read the dataset from a local JSON file instead of fetching it
    #[arg(long, value_name = "PATH", conflicts_with = "url")]
    pub input: Option<PathBuf>,

    /// Write the chart to PATH (.svg for bare SVG, anything else for HTML)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Chart width in pixels
    #[arg(long, value_name = "N")]
    pub width: Option<f64>,

    /// Chart height in pixels
    #[arg(long, value_name = "N")]
    pub height: Option<f64>,
}

impl CliArgs {
    /// Flags win over the environment by overwriting it before config is read.
    pub fn apply_env_overrides(&self) {
        for (name, value) in self.env_overrides() {
            std::env::set_var(name, value);
        }
    }

    fn env_overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        if let Some(url) = &self.url {
            overrides.push((ENV_DATASET_URL, url.clone()));
        }
        if let Some(output) = &self.output {
            overrides.push((ENV_OUTPUT, output.display().to_string()));
        }
        if let Some(width) = self.width {
            overrides.push((ENV_WIDTH, width.to_string()));
        }
        if let Some(height) = self.height {
            overrides.push((ENV_HEIGHT, height.to_string()));
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_parse() {
        let args = CliArgs::parse_from([
            "heatmap",
            "--headless",
            "--json",
            "--input",
            "data.json",
            "--output",
            "chart.svg",
            "--width",
            "900",
        ]);
        assert!(args.headless);
        assert!(args.json);
        assert_eq!(args.input, Some(PathBuf::from("data.json")));
        assert_eq!(args.height, None);
    }

    #[test]
    fn test_overrides_map_to_environment_names() {
        let args = CliArgs::parse_from([
            "heatmap",
            "--url",
            "http://localhost/data.json",
            "--width",
            "900",
        ]);
        assert_eq!(
            args.env_overrides(),
            vec![
                (ENV_DATASET_URL, "http://localhost/data.json".to_string()),
                (ENV_WIDTH, "900".to_string()),
            ]
        );
    }

    #[test]
    fn test_url_and_input_conflict() {
        assert!(CliArgs::try_parse_from(["heatmap", "--url", "x", "--input", "y"]).is_err());
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
