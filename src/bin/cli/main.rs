use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};

#[derive(Parser, Debug)]
#[command(name = "item-catalog-cli")]
#[command(about = "CLI for interacting with the item catalog server", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(short, long, env = "ITEM_CATALOG_URL", default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an item
    Create {
        /// Item title
        #[arg(short, long)]
        title: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
        /// Duration in minutes
        #[arg(long)]
        duration: i32,
        /// Price, e.g. 19.99
        #[arg(long)]
        price: f64,
    },

    /// Fetch an item by id
    Get {
        /// Item id
        id: String,
    },

    /// List items
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 10)]
        page_size: i64,
        /// Case-insensitive title search
        #[arg(short, long)]
        search: Option<String>,
        /// title, price, duration or createdAt
        #[arg(long)]
        sort_by: Option<String>,
        /// asc or desc
        #[arg(long)]
        sort_direction: Option<String>,
    },

    /// Replace an item's fields
    Update {
        /// Item id
        id: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        duration: i32,
        #[arg(long)]
        price: f64,
    },

    /// Delete an item
    Delete {
        /// Item id
        id: String,
    },
}

struct ItemClient {
    http: Client,
    base_url: String,
}

impl ItemClient {
    fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: format!("{}/api/items", base_url.trim_end_matches('/')),
        }
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn run(&self, command: Commands) -> Result<()> {
        let response = match command {
            Commands::Create {
                title,
                description,
                duration,
                price,
            } => {
                self.http
                    .post(&self.base_url)
                    .json(&item_body(title, description, duration, price))
                    .send()
                    .await
            }
            Commands::Get { id } => self.http.get(self.item_url(&id)).send().await,
            Commands::List {
                page,
                page_size,
                search,
                sort_by,
                sort_direction,
            } => {
                let mut params = vec![
                    ("page", page.to_string()),
                    ("pageSize", page_size.to_string()),
                ];
                if let Some(search) = search {
                    params.push(("search", search));
                }
                if let Some(sort_by) = sort_by {
                    params.push(("sortBy", sort_by));
                }
                if let Some(direction) = sort_direction {
                    params.push(("sortDirection", direction));
                }
                self.http.get(&self.base_url).query(&params).send().await
            }
            Commands::Update {
                id,
                title,
                description,
                duration,
                price,
            } => {
                self.http
                    .put(self.item_url(&id))
                    .json(&item_body(title, description, duration, price))
                    .send()
                    .await
            }
            Commands::Delete { id } => self.http.delete(self.item_url(&id)).send().await,
        }
        .context("Request to item catalog server failed")?;

        print_response(response).await
    }
}

fn item_body(title: String, description: Option<String>, duration: i32, price: f64) -> Value {
    json!({
        "title": title,
        "description": description,
        "durationMinutes": duration,
        "price": price,
    })
}

async fn print_response(response: Response) -> Result<()> {
    let status = response.status();
    match status {
        StatusCode::NO_CONTENT => {
            println!("Deleted");
            Ok(())
        }
        StatusCode::NOT_FOUND => bail!("Item not found"),
        StatusCode::BAD_REQUEST => {
            let problem: Value = response.json().await.context("Invalid error body")?;
            eprintln!("Validation failed:");
            if let Some(errors) = problem.get("errors").and_then(Value::as_object) {
                for (field, messages) in errors {
                    for message in messages.as_array().into_iter().flatten() {
                        eprintln!("  {}: {}", field, message.as_str().unwrap_or_default());
                    }
                }
            }
            bail!("Request rejected")
        }
        s if s.is_success() => {
            let body: Value = response.json().await.context("Invalid response body")?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        s => bail!("Server returned {}", s),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    ItemClient::new(&cli.url).run(cli.command).await
}
