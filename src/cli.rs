use clap::Parser;

/// Find the most trending AI headline, summarize it and store it.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Print the most recently saved articles instead of running discovery
    #[arg(long)]
    pub view: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_runs_discovery() {
        let cli = Cli::parse_from(["ai-news-agent"]);
        assert!(!cli.view);
    }

    #[test]
    fn view_flag() {
        let cli = Cli::parse_from(["ai-news-agent", "--view"]);
        assert!(cli.view);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["ai-news-agent", "--import", "feeds.opml"]).is_err());
    }
}
