use crate::check::{run_enquiry_check, EnquiryCheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use institute_admin::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Institute Admin",
    about = "Run the training institute admin API or check enquiry exports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with enquiry spreadsheet exports
    Enquiries {
        #[command(subcommand)]
        command: EnquiriesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EnquiriesCommand {
    /// Validate an export and print the enquiries it would create, without storing anything
    Check(EnquiryCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Enquiry CSV export loaded into the store before serving
    #[arg(long)]
    pub(crate) seed_enquiries: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Enquiries {
            command: EnquiriesCommand::Check(args),
        } => run_enquiry_check(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["institute-admin-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_seed_path() {
        let cli = Cli::try_parse_from([
            "institute-admin-api",
            "serve",
            "--port",
            "8080",
            "--seed-enquiries",
            "data/enquiries.csv",
        ])
        .expect("parses");

        let Some(Command::Serve(args)) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.port, Some(8080));
        assert_eq!(
            args.seed_enquiries.as_deref(),
            Some(std::path::Path::new("data/enquiries.csv"))
        );
    }

    #[test]
    fn enquiries_check_requires_a_file() {
        assert!(Cli::try_parse_from(["institute-admin-api", "enquiries", "check"]).is_err());
        let cli = Cli::try_parse_from(["institute-admin-api", "enquiries", "check", "export.csv"])
            .expect("parses");
        assert!(matches!(
            cli.command,
            Some(Command::Enquiries {
                command: EnquiriesCommand::Check(_)
            })
        ));
    }
}
