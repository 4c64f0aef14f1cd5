//! Site Plan CLI
//!
//! Generate, evaluate, analyse and render zoning site plans from the shell.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use siteplan_core::{
    view::{render, Canvas, ViewTransform},
    ComplianceEvaluator, DevelopmentType, LayoutGenerator, LayoutOptimizer, OptimizeMode,
    SiteAnalysis, SiteParameters, SitePlan, StreetType, ZoningRuleSet,
};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "siteplan", version)]
#[command(about = "Generate and check residential site plans against a zoning ordinance", long_about = None)]
struct Cli {
    /// Zoning rule set file (JSON or YAML); defaults to $SITEPLAN_RULESET or the municipal ordinance
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Write output here instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a site plan and print it as JSON
    Generate {
        #[command(flatten)]
        site: SiteArgs,

        /// Optimize density before output
        #[arg(long, value_enum, default_value_t = OptimizeArg::None)]
        optimize: OptimizeArg,
    },

    /// Check a plan against the rule set
    Evaluate {
        /// Previously generated plan JSON; generated from the site flags when absent
        #[arg(long)]
        plan: Option<PathBuf>,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Build the site analysis export payload
    Analyze {
        #[command(flatten)]
        site: SiteArgs,

        /// Units proposed by the applicant
        #[arg(long)]
        proposed_units: Option<u32>,
    },

    /// Render a plan to SVG or to the draw-command JSON
    Render {
        /// Previously generated plan JSON; generated from the site flags when absent
        #[arg(long)]
        plan: Option<PathBuf>,

        #[command(flatten)]
        site: SiteArgs,

        #[arg(long, value_enum, default_value_t = RenderFormat::Svg)]
        format: RenderFormat,

        /// Zoom factor (clamped to 0.5..=3)
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        /// Horizontal pan in pixels
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        pan_x: f64,

        /// Vertical pan in pixels
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        pan_y: f64,

        #[arg(long, default_value_t = 800.0)]
        canvas_width: f64,

        #[arg(long, default_value_t = 600.0)]
        canvas_height: f64,
    },

    /// Print the JSON schema of the analysis payload
    Schema,
}

#[cfg(feature = "cli")]
#[derive(Args, Debug, Clone)]
struct SiteArgs {
    /// Site area (acres)
    #[arg(long, default_value_t = 0.0)]
    area: f64,

    /// Parcel frontage width (ft)
    #[arg(long, default_value_t = 0.0)]
    width: f64,

    /// Parcel depth (ft)
    #[arg(long, default_value_t = 0.0)]
    depth: f64,

    /// Frontage street classification
    #[arg(long, default_value = "local", value_parser = parse_street_type)]
    street_type: StreetType,

    #[arg(long, default_value = "single-family", value_parser = parse_development_type)]
    development_type: DevelopmentType,

    /// Desired lot size (sq ft)
    #[arg(long, default_value_t = 5000.0)]
    target_lot_size: f64,

    /// Urban parcel (lower minimum lot size)
    #[arg(long)]
    urban: bool,
}

#[cfg(feature = "cli")]
impl SiteArgs {
    fn parameters(&self) -> SiteParameters {
        SiteParameters {
            area: self.area,
            width: self.width,
            depth: self.depth,
            is_urban: self.urban,
            street_type: self.street_type,
            development_type: self.development_type,
            target_lot_size: self.target_lot_size,
        }
    }

    /// Parameters checked before anything is generated.
    fn validated(&self) -> Result<SiteParameters> {
        let params = self.parameters();
        params.validate().context("invalid site parameters")?;
        Ok(params)
    }
}

#[cfg(feature = "cli")]
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OptimizeArg {
    None,
    Single,
    Refine,
}

#[cfg(feature = "cli")]
impl From<OptimizeArg> for OptimizeMode {
    fn from(arg: OptimizeArg) -> Self {
        match arg {
            OptimizeArg::None => OptimizeMode::None,
            OptimizeArg::Single => OptimizeMode::Single,
            OptimizeArg::Refine => OptimizeMode::Refine,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum RenderFormat {
    Svg,
    Json,
}

#[cfg(feature = "cli")]
fn parse_street_type(value: &str) -> std::result::Result<StreetType, String> {
    Ok(StreetType::parse_lossy(value))
}

#[cfg(feature = "cli")]
fn parse_development_type(value: &str) -> std::result::Result<DevelopmentType, String> {
    Ok(DevelopmentType::parse_lossy(value))
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let rules = load_rules(cli.rules.as_deref())?;
    let output = run(&cli.command, &rules)?;
    emit(cli.out.as_deref(), &output)
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // stdout carries the command output; logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "siteplan_core=info,siteplan=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(feature = "cli")]
fn load_rules(path: Option<&Path>) -> Result<ZoningRuleSet> {
    match path {
        Some(path) => ZoningRuleSet::load(path)
            .with_context(|| format!("failed to load rule set from {}", path.display())),
        None => Ok(ZoningRuleSet::from_env_or_default()),
    }
}

#[cfg(feature = "cli")]
fn run(command: &Commands, rules: &ZoningRuleSet) -> Result<String> {
    match command {
        Commands::Generate { site, optimize } => {
            let params = site.validated()?;
            let generated = LayoutGenerator::new(rules.clone()).generate(&params);
            let plan = match OptimizeMode::from(*optimize) {
                OptimizeMode::None => generated,
                OptimizeMode::Single => LayoutOptimizer::new(rules.clone()).optimize(&generated),
                OptimizeMode::Refine => LayoutOptimizer::new(rules.clone()).refine(&generated).plan,
            };
            tracing::info!(plan = %plan.id, lots = plan.statistics.total_lots, "plan ready");
            Ok(serde_json::to_string_pretty(&plan)?)
        }

        Commands::Evaluate { plan, site } => {
            let plan = plan_from(plan.as_deref(), site, rules)?;
            let result = ComplianceEvaluator::new(rules.clone()).evaluate(&plan);
            Ok(serde_json::to_string_pretty(&result)?)
        }

        Commands::Analyze {
            site,
            proposed_units,
        } => {
            let analysis = SiteAnalysis::build(&site.parameters(), *proposed_units, rules)
                .context("failed to analyse site")?;
            Ok(analysis.to_json_pretty()?)
        }

        Commands::Render {
            plan,
            site,
            format,
            zoom,
            pan_x,
            pan_y,
            canvas_width,
            canvas_height,
        } => {
            let plan = plan_from(plan.as_deref(), site, rules)?;
            let transform = ViewTransform::new(*zoom, *pan_x, *pan_y);
            let canvas = Canvas {
                width: *canvas_width,
                height: *canvas_height,
            };
            let scene = render(Some(&plan), &transform, canvas);
            match format {
                RenderFormat::Svg => Ok(scene.to_svg()),
                RenderFormat::Json => Ok(serde_json::to_string_pretty(&scene)?),
            }
        }

        Commands::Schema => Ok(serde_json::to_string_pretty(&SiteAnalysis::json_schema())?),
    }
}

#[cfg(feature = "cli")]
fn plan_from(path: Option<&Path>, site: &SiteArgs, rules: &ZoningRuleSet) -> Result<SitePlan> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read plan {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("{} is not a site plan", path.display()))
        }
        None => Ok(LayoutGenerator::new(rules.clone()).generate(&site.validated()?)),
    }
}

#[cfg(feature = "cli")]
fn emit(out: Option<&Path>, body: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{body}"),
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("siteplan CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
