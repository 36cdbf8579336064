use rdap::{Client, Config, Query, QueryType};
use std::env;
use std::str::FromStr;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .init();

    let mut args = env::args().skip(1);
    let query = match (args.next(), args.next()) {
        (Some(object), None) => Query::from_str(&object),
        (Some(kind), Some(object)) => match query_type(&kind) {
            Some(query_type) => Query::parse(query_type, &object),
            None => {
                println!("Unknown query type {kind}");
                return;
            }
        },
        _ => {
            println!(
                "Usage: query [domain|autnum|ip|ipnetwork|entity] <object>"
            );
            return;
        }
    };
    let query = match query {
        Ok(query) => query,
        Err(err) => {
            println!("Invalid query: {err}");
            return;
        }
    };

    let client = Client::bootstrap(&Config::default());
    match client.query_as::<serde_json::Value>(&query) {
        Ok(object) => {
            println!("{}", serde_json::to_string_pretty(&object).unwrap())
        }
        Err(err) => println!("Error: {err}"),
    }
}

fn query_type(kind: &str) -> Option<QueryType> {
    match kind {
        "domain" => Some(QueryType::Domain),
        "autnum" => Some(QueryType::Autnum),
        "ip" => Some(QueryType::Ip),
        "ipnetwork" => Some(QueryType::IpNetwork),
        "entity" => Some(QueryType::Entity),
        _ => None,
    }
}
