//! smartdoc-cli: terminal client for a running `smartdoc-server`
//!
//! # Subcommands
//! - `recommend <query> [-n N] [--location L] [--specialty S] [--json]`
//! - `search <query> [-n N] [--location L] [--specialty S] [--json]`
//! - `status`, `locations`, `specialties`, `examples`

use anyhow::{anyhow, bail};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";
const DEFAULT_RESULTS: usize = 5;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "smartdoc-cli", version, about = "Find a doctor for your symptoms")]
struct Cli {
    /// SmartDoc HTTP server URL (overrides SMARTDOC_URL env var)
    #[arg(long, env = "SMARTDOC_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// Symptoms or medical concern
    query: String,

    /// Number of doctors to retrieve (1-20)
    #[arg(short = 'n', long, default_value_t = DEFAULT_RESULTS)]
    n_results: usize,

    /// Restrict to a location, e.g. "Boston, MA"
    #[arg(long)]
    location: Option<String>,

    /// Restrict to a primary specialty, e.g. "Cardiology"
    #[arg(long)]
    specialty: Option<String>,

    /// Print the raw JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Recommend a doctor with an explanation
    Recommend(QueryArgs),

    /// Ranked vector search without an explanation
    Search(QueryArgs),

    /// Show server health
    Status,

    /// List filterable locations
    Locations,

    /// List filterable specialties
    Specialties,

    /// Show example patient queries
    Examples,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Doctor {
    pub doctor_id: String,
    pub name: String,
    pub primary_specialty: String,
    pub sub_specialty: String,
    pub location: String,
    pub hospital_affiliation: String,
    pub years_of_experience: u32,
    pub languages: String,
    /// `null` when the server computed a non-finite score.
    pub similarity_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchMetadata {
    pub total_results: usize,
    pub model_used: Option<String>,
    pub explanation_source: String,
}

#[derive(Debug, Deserialize)]
pub struct Recommendation {
    pub recommendation: Option<Doctor>,
    pub explanation: String,
    pub alternative_options: Vec<Doctor>,
    pub search_metadata: SearchMetadata,
}

/// Response of POST /recommend
#[derive(Debug, Deserialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub recommendation: Option<Recommendation>,
    pub message: Option<String>,
}

/// Response of POST /search
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Doctor>,
    pub total: usize,
}

// ============================================================================
// Formatting
// ============================================================================

pub fn format_doctor(rank: Option<usize>, d: &Doctor) -> String {
    let prefix = rank.map(|r| format!("{r}. ")).unwrap_or_default();
    let score = match d.similarity_score {
        Some(s) if s.is_finite() => format!("{:.0}%", s * 100.0),
        _ => "n/a".to_string(),
    };
    format!(
        "{prefix}{} ({})\n   {} / {}\n   {}, {}\n   {} years · {}\n   Match: {score}",
        d.name,
        d.doctor_id,
        d.primary_specialty,
        d.sub_specialty,
        d.hospital_affiliation,
        d.location,
        d.years_of_experience,
        d.languages,
    )
}

pub fn format_recommendation(resp: &RecommendResponse) -> String {
    let rec = match (&resp.recommendation, resp.success) {
        (Some(rec), true) => rec,
        _ => {
            return resp
                .message
                .clone()
                .unwrap_or_else(|| "No recommendation available.".to_string())
        }
    };

    let mut out = Vec::new();
    match &rec.recommendation {
        Some(top) => out.push(format!("Recommended doctor:\n{}", format_doctor(None, top))),
        None => out.push("No recommended doctor.".to_string()),
    }
    out.push(rec.explanation.clone());

    if !rec.alternative_options.is_empty() {
        let alternatives: Vec<String> = rec
            .alternative_options
            .iter()
            .enumerate()
            .map(|(i, d)| format_doctor(Some(i + 1), d))
            .collect();
        out.push(format!("Alternatives:\n{}", alternatives.join("\n")));
    }

    let meta = &rec.search_metadata;
    out.push(format!(
        "[{} candidates · explanation: {}{}]",
        meta.total_results,
        meta.explanation_source,
        meta.model_used
            .as_deref()
            .map(|m| format!(" ({m})"))
            .unwrap_or_default()
    ));
    out.join("\n\n")
}

pub fn format_search(resp: &SearchResponse) -> String {
    if resp.results.is_empty() {
        return "No doctors found matching your criteria.".to_string();
    }
    let rows: Vec<String> = resp
        .results
        .iter()
        .enumerate()
        .map(|(i, d)| format_doctor(Some(i + 1), d))
        .collect();
    format!("{} doctors found\n\n{}", resp.total, rows.join("\n\n"))
}

/// Error message from a `{error, status: "error"}` body, or the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client(timeout_secs: u64) -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

fn read_body(url: &str, resp: reqwest::Result<reqwest::blocking::Response>) -> anyhow::Result<String> {
    let resp = resp.map_err(|e| anyhow!("connection failed to {}: {}", url, e))?;
    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    if !status.is_success() {
        bail!("server returned {}: {}", status, error_message(&body));
    }
    Ok(body)
}

fn post_query(server: &str, path: &str, args: &QueryArgs) -> anyhow::Result<String> {
    // The LLM call can be slow; leave room for it.
    let client = client(90)?;
    let url = format!("{}{}", server, path);
    let body = serde_json::json!({
        "query": args.query,
        "location": args.location,
        "specialty": args.specialty,
        "n_results": args.n_results,
    });
    read_body(&url, client.post(&url).json(&body).send())
}

fn get(server: &str, path: &str) -> anyhow::Result<serde_json::Value> {
    let client = client(10)?;
    let url = format!("{}{}", server, path);
    Ok(serde_json::from_str(&read_body(&url, client.get(&url).send())?)?)
}

fn print_raw(body: &str) -> anyhow::Result<()> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn do_recommend(server: &str, args: &QueryArgs) -> anyhow::Result<()> {
    let body = post_query(server, "/recommend", args)?;
    if args.json {
        return print_raw(&body);
    }
    let resp: RecommendResponse = serde_json::from_str(&body)?;
    println!("{}", format_recommendation(&resp));
    Ok(())
}

fn do_search(server: &str, args: &QueryArgs) -> anyhow::Result<()> {
    let body = post_query(server, "/search", args)?;
    if args.json {
        return print_raw(&body);
    }
    let resp: SearchResponse = serde_json::from_str(&body)?;
    println!("{}", format_search(&resp));
    Ok(())
}

/// GET /health; a 503 still carries a useful body, so read it either way.
fn do_status(server: &str) -> anyhow::Result<()> {
    let client = client(10)?;
    let url = format!("{}/health", server);
    let resp = client
        .get(&url)
        .send()
        .map_err(|e| anyhow!("cannot reach {}: {}", url, e))?;
    let healthy = resp.status().is_success();
    let body: serde_json::Value = resp.json().unwrap_or_default();

    println!("SmartDoc server: {}", body["status"].as_str().unwrap_or("unknown"));
    println!("Database:        {}", body["database_connected"]);
    println!("LLM enabled:     {}", body["llm_enabled"]);
    println!("Message:         {}", body["message"].as_str().unwrap_or("?"));

    if !healthy {
        bail!("server unhealthy");
    }
    Ok(())
}

fn do_list(server: &str, path: &str, key: &str) -> anyhow::Result<()> {
    let body = get(server, path)?;
    for item in body[key].as_array().into_iter().flatten() {
        println!("{}", item.as_str().unwrap_or_default());
    }
    Ok(())
}

fn do_examples(server: &str) -> anyhow::Result<()> {
    let body = get(server, "/examples")?;
    for ex in body["examples"].as_array().into_iter().flatten() {
        println!("{}", ex["description"].as_str().unwrap_or_default());
        println!("  query:    {}", ex["query"].as_str().unwrap_or_default());
        println!("  location: {}", ex["location"].as_str().unwrap_or("any"));
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match &cli.command {
        Commands::Recommend(args) => do_recommend(&server, args),
        Commands::Search(args) => do_search(&server, args),
        Commands::Status => do_status(&server),
        Commands::Locations => do_list(&server, "/locations", "locations"),
        Commands::Specialties => do_list(&server, "/specialties", "specialties"),
        Commands::Examples => do_examples(&server),
    };

    if let Err(e) = result {
        eprintln!("smartdoc-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
