use super::parser_util::{general_error, general_parser};
use super::parsing_data::*;
use std::fs;

/// Networks each router may serve when `[Topology]` leaves out `max-networks`.
pub const DEFAULT_MAX_NETWORKS: usize = 4;

/// Routes remembered when `[Topology]` leaves out `capacity`.
pub const DEFAULT_CAPACITY: usize = hopnet_core::route_cache::DEFAULT_CAPACITY;

/// Largest `routers` a topology file may declare.
pub const MAX_ROUTERS: usize = 1024;

/// Largest `max-networks` a topology file may declare.
pub const MAX_NETWORKS_PER_ROUTER: usize = 1024;

/// Reads and parses the topology file at `file_path`.
///
/// Returns the parsed description, or an error message naming the file and
/// the offending line.
pub fn core_parser(file_path: &str) -> Result<TopologyDescription, String> {
    let s = fs::read_to_string(file_path)
        .map_err(|e| format!("Errors at {file_path}:\n\n{e}\n"))?;
    parse_description(&s).map_err(|e| format!("Errors at {file_path}:\n\n{e}"))
}

/// This is the core parsing logic that runs through a topology description.
///
/// Every non-empty line is a `[Type key='value' ...]` section. `Topology`,
/// `Links` and `Router` sit at the left margin; `Row` lines belong to the
/// `Links` above them and `Network` lines to the `Router` above them, each
/// indented by one tab. Lines starting with `#` are ignored.
pub fn parse_description(s: &str) -> Result<TopologyDescription, String> {
    let s = s.replace('\r', "").replace("    ", "\t");
    let mut description: Option<TopologyDescription> = None;
    // the top level section the current children belong to
    let mut parent: Option<DecType> = None;

    for (index, line) in s.lines().enumerate() {
        let line_num = index as i32 + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // count how many tabs there are at the beginning of the line
        let num_tabs = line.chars().take_while(|c| c == &'\t').count();
        let (dectype, options) = general_parser(&line[num_tabs..], line_num)?;

        let desc = match description.as_mut() {
            Some(desc) => desc,
            None if num_tabs == 0 && dectype == DecType::Topology => {
                description = Some(topology_parser(&options, line_num)?);
                parent = Some(DecType::Topology);
                continue;
            }
            None => {
                return Err(format!(
                    "Line {line_num}: [Topology] must be declared before {dectype:?}\n"
                ))
            }
        };

        match (num_tabs, dectype, parent) {
            (0, DecType::Topology, _) => {
                return Err(format!("Line {line_num}: Topology declared more than once\n"));
            }
            (0, DecType::Links, _) => {
                check_arguments(&options, &[], dectype, line_num)?;
                parent = Some(DecType::Links);
            }
            (0, DecType::Router, _) => {
                let router = router_parser(desc, &options, line_num)?;
                desc.routers.push(router);
                parent = Some(DecType::Router);
            }
            (1, DecType::Row, Some(DecType::Links)) => {
                let row = row_parser(desc, &options, line_num)?;
                desc.rows.push(row);
            }
            (1, DecType::Network, Some(DecType::Router)) => {
                check_arguments(&options, &["ip"], dectype, line_num)?;
                let ip = required(&options, "ip", dectype, line_num)?;
                // router_parser always runs before a Network can be accepted
                if let Some(router) = desc.routers.last_mut() {
                    router.networks.push(ip.to_string());
                }
            }
            (t, _, _) if t > 1 => {
                return Err(format!(
                    "Line {line_num}: Invalid tab count. Expected at most 1 tab, got {t} tabs.\n"
                ));
            }
            (_, _, parent) => {
                return Err(format!(
                    "Line {line_num}: Cannot declare {dectype:?} here{}.\n",
                    match parent {
                        Some(p) if num_tabs > 0 => format!(" inside of {p:?}"),
                        _ => String::new(),
                    }
                ));
            }
        }
    }

    description.ok_or_else(|| "No [Topology] declared\n".to_string())
}

fn topology_parser(options: &Params, line_num: i32) -> Result<TopologyDescription, String> {
    let dec = DecType::Topology;
    check_arguments(options, &["routers", "max-networks", "capacity"], dec, line_num)?;
    let router_count = number(required(options, "routers", dec, line_num)?, dec, line_num)?;
    at_most(router_count, MAX_ROUTERS, "routers", dec, line_num)?;
    let max_networks = match options.get("max-networks") {
        Some(n) => number(n, dec, line_num)?,
        None => DEFAULT_MAX_NETWORKS,
    };
    at_most(max_networks, MAX_NETWORKS_PER_ROUTER, "max-networks", dec, line_num)?;
    let capacity = match options.get("capacity") {
        Some(n) => number(n, dec, line_num)?,
        None => DEFAULT_CAPACITY,
    };
    Ok(TopologyDescription {
        router_count,
        max_networks,
        capacity,
        rows: Rows::new(),
        routers: Routers::new(),
    })
}

fn router_parser(
    desc: &TopologyDescription,
    options: &Params,
    line_num: i32,
) -> Result<RouterDeclaration, String> {
    let dec = DecType::Router;
    check_arguments(options, &["id"], dec, line_num)?;
    let router = number(required(options, "id", dec, line_num)?, dec, line_num)?;
    if desc.routers.iter().any(|r| r.router == router) {
        return Err(general_error(
            line_num,
            dec,
            format!("Router {router} is declared more than once\n"),
        ));
    }
    Ok(RouterDeclaration {
        router,
        networks: Vec::new(),
    })
}

fn row_parser(desc: &TopologyDescription, options: &Params, line_num: i32) -> Result<LinkRow, String> {
    let dec = DecType::Row;
    check_arguments(options, &["router", "links"], dec, line_num)?;
    let router = number(required(options, "router", dec, line_num)?, dec, line_num)?;
    if desc.rows.iter().any(|r| r.router == router) {
        return Err(general_error(
            line_num,
            dec,
            format!("Links for router {router} are declared more than once\n"),
        ));
    }
    let links = required(options, "links", dec, line_num)?
        .split_whitespace()
        .map(|entry| match entry {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(general_error(
                line_num,
                dec,
                format!("Link entries must be 0 or 1, got '{other}'\n"),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LinkRow { router, links })
}

/// Makes sure a section only uses the arguments it understands.
fn check_arguments(
    options: &Params,
    allowed: &[&str],
    dec: DecType,
    line_num: i32,
) -> Result<(), String> {
    match options.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(general_error(
            line_num,
            dec,
            format!("unknown argument '{key}'\n"),
        )),
        None => Ok(()),
    }
}

fn required<'a>(
    options: &'a Params,
    key: &str,
    dec: DecType,
    line_num: i32,
) -> Result<&'a str, String> {
    options
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| general_error(line_num, dec, format!("missing argument '{key}'\n")))
}

fn at_most(value: usize, max: usize, key: &str, dec: DecType, line_num: i32) -> Result<(), String> {
    if value > max {
        return Err(general_error(
            line_num,
            dec,
            format!("'{key}' may be at most {max}, got {value}\n"),
        ));
    }
    Ok(())
}

fn number<T: std::str::FromStr>(value: &str, dec: DecType, line_num: i32) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| general_error(line_num, dec, format!("'{value}' is not a number\n")))
}
