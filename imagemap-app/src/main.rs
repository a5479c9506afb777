mod cli;

use anyhow::anyhow;
use clap::Parser;
use cli::{CliArgs, Command};
use imagemap::prelude::*;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ViewReport {
    id: String,
    tiled: bool,
    image: ImageSize,
    #[serde(flatten)]
    fit: FitResult,
    /// Pyramid level drawn at cover zoom, for tiled views
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_level: Option<u8>,
    layers: Vec<String>,
}

fn fit_report(
    viewport: ViewportSize,
    image: ImageSize,
    boost: Option<f64>,
    tiled: bool,
) -> anyhow::Result<serde_json::Value> {
    let profile = if tiled {
        ViewerProfile::TilePyramid
    } else {
        ViewerProfile::SingleImage
    };
    let (_, mut options) = profile.resolve();
    if let Some(boost) = boost {
        options.boost = boost;
    }

    if tiled {
        let max_level = TilePyramid::levels_needed(image, TILE_SIZE);
        let pyramid = TilePyramid::new(image, max_level)?;
        let fit = pyramid.fit(viewport, &options)?;
        Ok(serde_json::json!({
            "fit": fit,
            "max_level": max_level,
            "cover_level": pyramid.cover_level(viewport)?,
            "tiles_at_max_level": pyramid.tiles_at_level(max_level),
        }))
    } else {
        let fit = ViewportFitCalculator::fit(viewport, image, &options)?;
        Ok(serde_json::to_value(fit)?)
    }
}

async fn views_report(path: &Path, viewport: ViewportSize) -> anyhow::Result<serde_json::Value> {
    let config = ViewerConfig::from_path(path)?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let loader = FileLoader::with_root(root);

    let map = Map::with_options(viewport, config.options.clone());
    let mut session = ViewSession::from_config(map, &config)?;
    session.layout_stable()?;

    let mut reports = Vec::new();
    for view in config.views.iter() {
        match session.open(&view.id, &loader).await {
            Ok(LoadOutcome::Applied(fit)) => {
                let active = session
                    .active_view()
                    .ok_or_else(|| anyhow!("view {} not active after open", view.id))?;
                let image = active.size.unwrap_or(ImageSize::new(0.0, 0.0));
                let cover_level = match active.max_tile_zoom {
                    Some(max_level) => Some(TilePyramid::new(image, max_level)?.cover_level(viewport)?),
                    None => None,
                };
                reports.push(ViewReport {
                    id: view.id.clone(),
                    tiled: view.is_tiled(),
                    image,
                    fit,
                    cover_level,
                    layers: session.surface().active_layers(),
                });
            }
            Ok(outcome) => log::warn!("view {} not fitted: {outcome:?}", view.id),
            Err(e) => log::error!("view {}: {e}", view.id),
        }
    }
    Ok(serde_json::to_value(reports)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    imagemap::init_logging();

    let args = CliArgs::parse();
    let report = match args.command {
        Command::Fit {
            viewport: (vw, vh),
            image: (iw, ih),
            boost,
            tiled,
        } => fit_report(ViewportSize::new(vw, vh), ImageSize::new(iw, ih), boost, tiled)?,
        Command::Views {
            config,
            viewport: (vw, vh),
        } => views_report(&config, ViewportSize::new(vw, vh)).await?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
