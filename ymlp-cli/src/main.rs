use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::io::Write;
use ymlp::{
    ArchiveQuery, Client, ContactFields, ContactQuery, Method, Pagination, Params, SortOrder,
    Timeout,
};

#[derive(Debug, Parser, Clone)]
#[command(name = "ymlp")]
#[command(about = "A CLI tool to manage a Your Mailing List Provider account")]
struct Cli {
    #[arg(short, long, env = "YMLP_USERNAME")]
    username: String,
    #[arg(short = 'k', long, env = "YMLP_API_KEY", hide_env_values = true)]
    api_key: String,
    /// Request timeout in seconds
    #[arg(short, long, env = "YMLP_TIMEOUT", default_value_t = 60)]
    timeout: u64,
    #[arg(long, env = "YMLP_BASE_URL")]
    base_url: Option<String>,
    /// Accept invalid TLS certificates
    #[arg(long, env = "YMLP_INSECURE")]
    insecure: bool,
    /// Appended to the User-Agent header
    #[arg(long, default_value = "")]
    user_agent: String,
    /// Log requests and responses to stderr
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand, Clone)]
enum Commands {
    #[command(about = "Checks the credentials against the API")]
    Ping,
    #[command(subcommand, about = "Manages groups")]
    Groups(GroupCommands),
    #[command(subcommand, about = "Manages custom contact fields")]
    Fields(FieldCommands),
    #[command(subcommand, about = "Manages filters")]
    Filters(FilterCommands),
    #[command(subcommand, about = "Manages contacts")]
    Contacts(ContactCommands),
    #[command(subcommand, about = "Manages sender addresses")]
    Froms(FromCommands),
    #[command(subcommand, about = "Reads sent newsletters")]
    Archive(ArchiveCommands),
    #[command(about = "Calls any API operation, e.g. `call Contacts.GetContact Email=jane@example.com`")]
    Call {
        operation: String,
        /// Parameters as KEY=VALUE pairs
        #[arg(value_parser = parse_key_value)]
        params: Vec<(String, String)>,
        #[arg(long)]
        post: bool,
        /// Print the response body without decoding it
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Debug, Subcommand, Clone)]
enum GroupCommands {
    #[command(about = "Lists all groups")]
    List,
    #[command(about = "Creates a group and prints its id")]
    Add { name: String },
    #[command(about = "Deletes a group")]
    Delete { id: u64 },
    #[command(about = "Renames a group")]
    Update { id: u64, name: String },
    #[command(about = "Removes every contact from a group")]
    Empty { id: u64 },
}

#[derive(Debug, Subcommand, Clone)]
enum FieldCommands {
    #[command(about = "Lists all custom fields")]
    List,
    #[command(about = "Deletes a custom field")]
    Delete { id: u64 },
}

#[derive(Debug, Subcommand, Clone)]
enum FilterCommands {
    #[command(about = "Lists all filters")]
    List {
        #[arg(long)]
        include_deleted: bool,
    },
    #[command(about = "Deletes a filter")]
    Delete { id: u64 },
}

#[derive(Debug, Subcommand, Clone)]
enum ContactCommands {
    #[command(about = "Adds a contact to one or more groups")]
    Add {
        email: String,
        #[arg(short, long, value_delimiter = ',', required = true)]
        groups: Vec<u64>,
        /// Custom field values as FIELD_ID=VALUE pairs
        #[arg(short, long, value_parser = parse_field)]
        field: Vec<(u64, String)>,
        #[arg(long)]
        overrule_unsubscribed_bounced: bool,
    },
    #[command(about = "Removes a contact from one or more groups")]
    Delete {
        email: String,
        #[arg(short, long, value_delimiter = ',', required = true)]
        groups: Vec<u64>,
    },
    #[command(about = "Unsubscribes a contact")]
    Unsubscribe { email: String },
    #[command(about = "Shows one contact")]
    Get { email: String },
    #[command(about = "Lists the contacts of one or more groups")]
    List {
        #[arg(short, long, value_delimiter = ',', required = true)]
        groups: Vec<u64>,
        #[command(flatten)]
        query: ContactArgs,
    },
}

#[derive(Debug, Args, Clone)]
struct ContactArgs {
    /// Custom fields to include
    #[arg(long, value_delimiter = ',')]
    fields: Vec<u64>,
    #[command(flatten)]
    page: PageArgs,
}

#[derive(Debug, Args, Clone)]
struct PageArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    per_page: Option<u32>,
    /// Newest first
    #[arg(long)]
    descending: bool,
}

impl PageArgs {
    fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            number_per_page: self.per_page,
        }
    }

    fn sorting(&self) -> Option<SortOrder> {
        self.descending.then_some(SortOrder::Descending)
    }
}

#[derive(Debug, Subcommand, Clone)]
enum FromCommands {
    #[command(about = "Lists sender addresses")]
    List,
    #[command(about = "Adds a sender address and prints its id")]
    Add { email: String, name: String },
    #[command(about = "Deletes a sender address")]
    Delete { id: u64 },
}

#[derive(Debug, Subcommand, Clone)]
enum ArchiveCommands {
    #[command(about = "Lists sent newsletters")]
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        show_test_messages: bool,
    },
    #[command(about = "Shows the statistics of one newsletter")]
    Summary { id: u64 },
}

fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{arg}`"))
}

fn parse_field(arg: &str) -> Result<(u64, String), String> {
    let (id, value) = parse_key_value(arg)?;
    let id = id
        .parse()
        .map_err(|_| format!("field id must be a number, got `{id}`"))?;
    Ok((id, value))
}

/// Initialise tracing on stderr. `--verbose` forces `debug`, otherwise
/// `RUST_LOG` decides.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &Value) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_confirmation(ok: bool, what: &str) -> Result<(), anyhow::Error> {
    if !ok {
        anyhow::bail!("{what} was not confirmed by the service");
    }
    println!("{what}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let mut builder = Client::builder(args.username, args.api_key)
        .timeout(Timeout::from_secs(args.timeout)?)
        .user_agent(args.user_agent)
        .insecure_skip_verify(args.insecure);
    if let Some(base_url) = args.base_url {
        builder = builder.base_url(base_url);
    }
    let client = builder.build()?;

    match args.command {
        Commands::Ping => print_json(&client.ping().await?)?,
        Commands::Groups(command) => match command {
            GroupCommands::List => print_json(&client.groups_get_list().await?)?,
            GroupCommands::Add { name } => println!("{}", client.groups_add(&name).await?),
            GroupCommands::Delete { id } => {
                print_confirmation(client.groups_delete(id).await?, &format!("Removed group {id}"))?
            }
            GroupCommands::Update { id, name } => print_confirmation(
                client.groups_update(id, &name).await?,
                &format!("Updated group {id}"),
            )?,
            GroupCommands::Empty { id } => print_json(&client.groups_empty(id).await?)?,
        },
        Commands::Fields(command) => match command {
            FieldCommands::List => print_json(&client.fields_get_list().await?)?,
            FieldCommands::Delete { id } => {
                print_confirmation(client.fields_delete(id).await?, &format!("Removed field {id}"))?
            }
        },
        Commands::Filters(command) => match command {
            FilterCommands::List { include_deleted } => {
                print_json(&client.filters_get_list(include_deleted).await?)?
            }
            FilterCommands::Delete { id } => print_json(&client.filters_delete(id).await?)?,
        },
        Commands::Contacts(command) => match command {
            ContactCommands::Add {
                email,
                groups,
                field,
                overrule_unsubscribed_bounced,
            } => {
                let fields: ContactFields = field.into_iter().collect();
                let added = client
                    .contacts_add(&email, &groups, &fields, overrule_unsubscribed_bounced)
                    .await?;
                print_confirmation(added, &format!("Added {email}"))?
            }
            ContactCommands::Delete { email, groups } => print_confirmation(
                client.contacts_delete(&email, &groups).await?,
                &format!("Removed {email}"),
            )?,
            ContactCommands::Unsubscribe { email } => print_confirmation(
                client.contacts_unsubscribe(&email).await?,
                &format!("Unsubscribed {email}"),
            )?,
            ContactCommands::Get { email } => {
                print_json(&client.contacts_get_contact(&email).await?)?
            }
            ContactCommands::List { groups, query } => {
                let query = ContactQuery {
                    fields: query.fields,
                    pagination: query.page.pagination(),
                    sorting: query.page.sorting(),
                    ..Default::default()
                };
                print_json(&client.contacts_get_list(&groups, &query).await?)?
            }
        },
        Commands::Froms(command) => match command {
            FromCommands::List => print_json(&client.newsletter_get_froms().await?)?,
            FromCommands::Add { email, name } => {
                println!("{}", client.newsletter_add_from(&email, &name).await?)
            }
            FromCommands::Delete { id } => print_confirmation(
                client.newsletter_delete_from(id).await?,
                &format!("Removed sender {id}"),
            )?,
        },
        Commands::Archive(command) => match command {
            ArchiveCommands::List {
                page,
                show_test_messages,
            } => {
                let query = ArchiveQuery {
                    pagination: page.pagination(),
                    sorting: page.sorting(),
                    show_test_messages,
                    ..Default::default()
                };
                print_json(&client.archive_get_list(&query).await?)?
            }
            ArchiveCommands::Summary { id } => {
                print_json(&client.archive_get_summary(id).await?)?
            }
        },
        Commands::Call {
            operation,
            params,
            post,
            raw,
        } => {
            let params: Params = params.into_iter().collect();
            let method = if post { Method::POST } else { Method::GET };
            if raw {
                let body = client.call_raw(&operation, params, method).await?;
                std::io::stdout().write_all(&body)?;
            } else {
                print_json(&client.call(&operation, params, method).await?)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_pairs() {
        assert_eq!(
            parse_key_value("Email=jane@example.com").unwrap(),
            ("Email".to_string(), "jane@example.com".to_string())
        );
        assert_eq!(
            parse_key_value("Text=a=b").unwrap(),
            ("Text".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("Email").is_err());
    }

    #[test]
    fn parses_custom_fields() {
        assert_eq!(parse_field("3=Jane").unwrap(), (3, "Jane".to_string()));
        assert!(parse_field("first=Jane").is_err());
    }

    #[test]
    fn cli_reads_global_flags() {
        let cli = Cli::try_parse_from([
            "ymlp",
            "--username",
            "jane",
            "--api-key",
            "secret",
            "--timeout",
            "5",
            "contacts",
            "add",
            "jane@example.com",
            "--groups",
            "1,2",
            "--field",
            "3=Jane",
        ])
        .unwrap();

        assert_eq!(cli.username, "jane");
        assert_eq!(cli.timeout, 5);
        match cli.command {
            Commands::Contacts(ContactCommands::Add { groups, field, .. }) => {
                assert_eq!(groups, vec![1, 2]);
                assert_eq!(field, vec![(3, "Jane".to_string())]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
