//! The interactive front end.
//!
//! [`Console`] reads answers line by line from any async reader and writes
//! prompts to any async writer. The binary wires it to stdin and stdout;
//! tests feed it a byte slice and read back what it printed.

use hopnet_core::{
    ip, ConfigError, Controller, HopProvider, HopProviderError, HopRejection, HopRequest,
    QueryError, QueryReport, ResolveError, RouteOrigin, RouterId, ShortcutChoice, Topology,
    TopologyBuilder,
};
use itertools::Itertools;
use std::io;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout,
};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Input closed")]
    Closed,
    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid topology: {0}")]
    Config(#[from] ConfigError),
}

impl From<HopProviderError> for ConsoleError {
    fn from(e: HopProviderError) -> Self {
        match e {
            HopProviderError::Closed => Self::Closed,
            HopProviderError::Io(msg) => Self::Io(io::Error::new(io::ErrorKind::Other, msg)),
        }
    }
}

impl From<ConsoleError> for HopProviderError {
    fn from(e: ConsoleError) -> Self {
        match e {
            ConsoleError::Closed => Self::Closed,
            other => Self::Io(other.to_string()),
        }
    }
}

/// Which end of a query an address is for.
#[derive(Debug, Clone, Copy)]
enum End {
    Source,
    Destination,
}

impl End {
    fn prompt(self) -> &'static str {
        match self {
            End::Source => "Enter source IP address: ",
            End::Destination => "Enter Destination IP address: ",
        }
    }

    fn unknown(self, ip: String) -> QueryError {
        match self {
            End::Source => QueryError::UnknownSource(ip),
            End::Destination => QueryError::UnknownDestination(ip),
        }
    }
}

/// A line-oriented operator console.
pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
    // messages from synchronous hop notifications, printed before the next prompt
    notices: Vec<String>,
    router_count: usize,
    manual_announced: bool,
}

impl Console<BufReader<Stdin>, Stdout> {
    /// A console on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
            notices: Vec::new(),
            router_count: 0,
            manual_announced: false,
        }
    }

    /// Everything written so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    async fn flush_notices(&mut self) -> Result<(), ConsoleError> {
        for notice in std::mem::take(&mut self.notices) {
            self.out.write_all(notice.as_bytes()).await?;
            self.out.write_all(b"\n").await?;
        }
        Ok(())
    }

    /// Prints `text` followed by a newline.
    pub async fn say(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.flush_notices().await?;
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }

    /// Prints `prompt` and waits for the next line of input.
    async fn ask(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        self.flush_notices().await?;
        self.out.write_all(prompt.as_bytes()).await?;
        self.out.flush().await?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(ConsoleError::Closed),
        }
    }

    /// Asks until the answer is a whole number.
    async fn ask_number(&mut self, prompt: &str) -> Result<i64, ConsoleError> {
        loop {
            match self.ask(prompt).await?.parse() {
                Ok(n) => return Ok(n),
                Err(_) => self.say("Please enter a number.").await?,
            }
        }
    }

    /// Prints the adjacency matrix, 1 meaning a direct link.
    pub async fn print_links(&mut self, topology: &Topology) -> Result<(), ConsoleError> {
        let mut text = String::from("Routers are connected like this (1 = Direct Link):\n ");
        for to in topology.routers() {
            text += &format!(" {}", to.into_inner());
        }
        for from in topology.routers() {
            let row = topology
                .routers()
                .map(|to| if topology.adjacent(from, to) { "1" } else { "0" })
                .join(" ");
            text += &format!("\n{} {}", from.into_inner(), row);
        }
        self.say(&text).await
    }

    /// Asks for the networks served by every router, then builds the
    /// topology.
    ///
    /// All network counts are asked for first, then each address. Invalid
    /// answers, including addresses another router already serves, are
    /// reported and asked for again.
    pub async fn read_networks(
        &mut self,
        mut builder: TopologyBuilder,
    ) -> Result<Topology, ConsoleError> {
        let max = builder.max_networks();
        let mut counts = Vec::with_capacity(builder.router_count());
        for index in 0..builder.router_count() {
            let router = index + 1;
            let prompt =
                format!("How many networks are joined to router {router} (max {max}): ");
            let count = loop {
                match usize::try_from(self.ask_number(&prompt).await?) {
                    Ok(n) if n <= max => break n,
                    _ => continue,
                }
            };
            counts.push(count);
        }
        self.say(&format!(
            "Total networks defined: {}",
            counts.iter().sum::<usize>()
        ))
        .await?;

        for (index, count) in counts.into_iter().enumerate() {
            let router = RouterId::new(index as u32 + 1);
            for n in 1..=count {
                let prompt = format!(
                    "Enter router {} Network IP address {n}: ",
                    router.into_inner()
                );
                loop {
                    let ip = self.ask(&prompt).await?;
                    match builder.network(router, ip) {
                        Ok(_) => break,
                        Err(e) => self.say(&format!("{e}. Please re-enter.")).await?,
                    }
                }
            }
        }

        let topology = builder.build()?;
        self.say("\nIP configurations loaded successfully.").await?;
        Ok(topology)
    }

    /// Asks for an address until it is valid and served by some router.
    async fn read_address(
        &mut self,
        topology: &Topology,
        end: End,
    ) -> Result<(String, RouterId), ConsoleError> {
        loop {
            let ip = self.ask(end.prompt()).await?;
            if !ip::validate(&ip) {
                self.say("Invalid IP format. Please re-enter.").await?;
                continue;
            }
            match topology.owner_router(&ip) {
                Some(router) => return Ok((ip, router)),
                None => {
                    let e = end.unknown(ip);
                    self.say(&format!("Error: {e}. Please re-enter.")).await?;
                }
            }
        }
    }

    /// Runs routing queries until the operator stops or input runs out.
    pub async fn run(&mut self, controller: &mut Controller) -> Result<(), ConsoleError> {
        self.router_count = controller.topology().router_count();
        self.print_links(controller.topology()).await?;

        let mut number = 1;
        loop {
            self.say(&format!("\n--- Start Routing Query {number} ---"))
                .await?;
            let (source, source_router) =
                self.read_address(controller.topology(), End::Source).await?;
            self.say(&format!("Source router is {}", source_router.into_inner()))
                .await?;
            let (destination, destination_router) = self
                .read_address(controller.topology(), End::Destination)
                .await?;
            self.say(&format!(
                "Destination router is {}",
                destination_router.into_inner()
            ))
            .await?;

            self.manual_announced = false;
            match controller.query(&source, &destination, self).await {
                Ok(report) => self.show(&report).await?,
                Err(QueryError::Resolve(ResolveError::Provider(e))) => return Err(e.into()),
                Err(e) => self.say(&format!("Error: {e}")).await?,
            }
            number += 1;

            let answer = self
                .ask("\nDo you want to continue routing? (0=Yes, 1=No): ")
                .await?;
            if answer != "0" {
                break;
            }
        }
        self.say("\n--- Simulation Ended ---").await
    }

    /// Prints the outcome of a query.
    async fn show(&mut self, report: &QueryReport) -> Result<(), ConsoleError> {
        let path = &report.path;
        let text = match report.origin {
            RouteOrigin::Cache => format!(
                "\n--- HISTORY FOUND ---\n\
                 Source IP address: {} \n\
                 --> Source Router: {} \n\
                 --> Destination Router: {} \n\
                 --> Destination IP address: {}\n\
                 Intermediate Routers details (Concatenated IDs): {}",
                report.query.source,
                report.source_router.into_inner(),
                report.destination_router.into_inner(),
                report.query.destination,
                path.legacy_encoding()
            ),
            RouteOrigin::Fresh { cached: true } => format!(
                "\n--- NEW ROUTE LOGGED ---\n\
                 Source IP: {}\n\
                 Intermediate Routers Path (IDs): {}\n\n\
                 Path established: {}",
                report.query.source,
                path.legacy_encoding(),
                path
            ),
            RouteOrigin::Fresh { cached: false } => format!(
                "\nWarning: Route history full.\n\nPath established: {}",
                path
            ),
        };
        self.say(&text).await
    }
}

#[async_trait::async_trait]
impl<R, W> HopProvider for Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn offer_shortcut(
        &mut self,
        source: RouterId,
        destination: RouterId,
    ) -> Result<ShortcutChoice, HopProviderError> {
        self.say(&format!(
            "Direct link found between {source} and {destination}."
        ))
        .await?;
        let answer = self
            .ask("Do you want to choose the direct path for routing (1=Yes, 0=No/Custom): ")
            .await?;
        if answer == "1" {
            self.say("\n--- DIRECT ROUTE SELECTED ---").await?;
            Ok(ShortcutChoice::Accept)
        } else {
            Ok(ShortcutChoice::Decline)
        }
    }

    async fn next_hop(
        &mut self,
        current: RouterId,
        _destination: RouterId,
    ) -> Result<HopRequest, HopProviderError> {
        if !self.manual_announced {
            self.manual_announced = true;
            self.say("\n--- MANUAL ROUTE DEFINITION ---").await?;
        }
        let prompt = format!(
            "Current router: {current}. Enter next intermediate router (1-{}, or 0 to finalize): ",
            self.router_count
        );
        // anything but a number is an id no router has
        Ok(match self.ask(&prompt).await?.parse() {
            Ok(0) => HopRequest::Finalize,
            Ok(n) => HopRequest::Router(n),
            Err(_) => HopRequest::Router(-1),
        })
    }

    fn rejected(&mut self, rejection: &HopRejection) {
        self.notices.push(rejection.to_string());
    }

    fn destination_reachable(&mut self, current: RouterId, destination: RouterId) {
        self.notices.push(format!(
            "{current} is now directly connected to Destination {destination}. \
             Type 0 to finalize or enter another intermediate router."
        ));
    }

    fn arrived(&mut self, from: RouterId, destination: RouterId, via: HopRequest) {
        self.notices.push(match via {
            HopRequest::Finalize => {
                format!("Path finalized: {from} -> {destination} (Destination)")
            }
            HopRequest::Router(_) => format!("Destination {destination} reached successfully!"),
        });
    }
}
