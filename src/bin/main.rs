use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use lg_search::config::CommunityConfig;
use lg_search::filter::NeighborFilter;
use lg_search::models::{AddrFamily, LookupRoute, Neighbor};
use lg_search::FilterSet;
use log::info;

/// lg-search runs looking-glass searches over route and neighbor dumps.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// Community configuration file, local or remote.
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[clap(long, global = true)]
    pretty: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter routes and list the filters still available
    Routes {
        /// JSON file with a list of routes, each with its route server and neighbor.
        #[clap(name = "FILE")]
        file_path: PathBuf,

        /// URL query string, e.g. `asns=64512&communities=65000:100`
        #[clap(short, long, default_value = "")]
        query: String,

        /// Search token, e.g. `#65000:100`. Can be repeated.
        #[clap(short, long)]
        token: Vec<String>,
    },
    /// Search neighbors by name or ASN
    Neighbors {
        /// JSON file with a list of neighbors.
        #[clap(name = "FILE")]
        file_path: PathBuf,

        /// URL query string, e.g. `name=transit` or `asn=64512`
        #[clap(short, long)]
        query: String,
    },
}

fn exit_with<E: std::fmt::Display>(err: E) -> ! {
    eprintln!("{}", err);
    std::process::exit(1);
}

fn path_str(path: &Path) -> &str {
    match path.to_str() {
        Some(p) => p,
        None => exit_with(format!("invalid path: {}", path.display())),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    let content = match oneio::read_to_string(path_str(path)) {
        Ok(c) => c,
        Err(err) => exit_with(err),
    };
    match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(err) => exit_with(format!("cannot parse {}: {}", path.display(), err)),
    }
}

/// Makes routes of the same route server share one id allocation.
fn intern_route_server_ids(routes: &mut [LookupRoute]) {
    let mut ids: HashMap<String, Arc<str>> = HashMap::new();
    for lookup in routes.iter_mut() {
        let id = ids
            .entry(lookup.route_server.id.to_string())
            .or_insert_with(|| lookup.route_server.id.clone())
            .clone();
        lookup.neighbor.route_server_id = id.clone();
        lookup.route_server.id = id;
    }
}

fn search_routes(
    routes: Vec<LookupRoute>,
    query: &str,
    tokens: &[String],
    config: &CommunityConfig,
) -> serde_json::Value {
    let request = match (
        FilterSet::from_query_str(query),
        FilterSet::from_tokens(tokens),
    ) {
        (Ok(q), Ok(t)) => q.combine(&t),
        (Err(err), _) | (_, Err(err)) => exit_with(err),
    };

    let matched = routes
        .into_iter()
        .filter(|r| request.match_route(r))
        .collect::<Vec<_>>();
    info!("{} routes matched", matched.len());

    let mut aggregate = FilterSet::new();
    for lookup in &matched {
        aggregate.add_from_lookup_route(lookup);
    }
    let families = matched
        .iter()
        .map(|r| r.route.addr_family())
        .collect::<Vec<_>>();
    aggregate.set_addr_families(
        families.contains(&AddrFamily::Ipv4),
        families.contains(&AddrFamily::Ipv6),
    );
    aggregate.label_communities(&config.all_labels());

    let mut applied = request.clone();
    applied.merge_properties(&aggregate);

    let blackholes = matched
        .iter()
        .filter(|r| config.blackholes.matches_bgp_info(&r.route.bgp))
        .map(|r| r.route.id.as_str())
        .collect::<Vec<_>>();

    json!({
        "filters_applied": applied,
        "filters_available": aggregate.sub(&request),
        "blackholes": blackholes,
        "routes": matched,
    })
}

fn search_neighbors(neighbors: Vec<Neighbor>, query: &str) -> serde_json::Value {
    let filter = NeighborFilter::from_query_str(query);
    let matched = neighbors
        .into_iter()
        .filter(|n| filter.matches(n))
        .collect::<Vec<_>>();
    info!("{} neighbors matched", matched.len());
    json!({ "neighbors": matched })
}

fn main() {
    let opts: Opts = Opts::parse();

    env_logger::init();

    let config = match &opts.config {
        None => CommunityConfig::default(),
        Some(path) => match CommunityConfig::from_path(path_str(path)) {
            Ok(c) => c,
            Err(err) => exit_with(err),
        },
    };
    for diagnostic in &config.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    let output = match &opts.command {
        Command::Routes {
            file_path,
            query,
            token,
        } => {
            let mut routes: Vec<LookupRoute> = read_json(file_path);
            intern_route_server_ids(&mut routes);
            search_routes(routes, query, token, &config)
        }
        Command::Neighbors { file_path, query } => {
            search_neighbors(read_json(file_path), query)
        }
    };

    let output_str = if opts.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    };
    match output_str {
        Ok(s) => println!("{}", s),
        Err(err) => exit_with(err),
    }
}
