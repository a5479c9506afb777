//! View lifecycle: which view is on screen and how it gets there.
//!
//! A [`ViewSession`] owns the display surface and the catalog of declared
//! views. Opening a view is split in two, mirroring how assets arrive: the
//! caller first asks for a switch and gets a [`LoadTicket`], then reports the
//! asset's natural size (or a load failure) against that ticket. Tickets carry
//! a monotonically increasing token and only the newest one may touch the
//! surface, so a slow load for a view the user already switched away from is
//! dropped instead of replacing the newer view.
//!
//! Applying a fit always runs in the same order:
//! 1. swap the layer in (the old one is removed first, then the new one
//!    attached, so exactly one view layer is active),
//! 2. set the view to the focus point at the start zoom,
//! 3. set the minimum zoom to the cover zoom,
//! 4. lock the pan bounds rigidly, but only once layout is reported stable.
//!
//! Resizes rerun steps 3 and 4 against the new container size.

use crate::{
    core::{
        config::ViewerConfig,
        constants::RIGID_VISCOSITY,
        fit::{FitOptions, FitResult, ViewportFitCalculator},
        geo::{ImageSize, Point, ViewportSize},
    },
    layers::{base::LayerTrait, image::ImageOverlay, tile::TileLayer},
    loader::ImageLoader,
    tiles::{pyramid::TilePyramid, source::TemplateSource},
    traits::DisplaySurface,
    MapError, Result,
};
use serde::{Deserialize, Serialize};

pub use crate::input::events::SessionInput;

/// A declared thing to look at. Immutable; switching replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub id: String,
    /// Image URL/path, or a `{z}/{x}/{y}` template for tiled views
    pub locator: String,
    /// Natural size; probed through an [`ImageLoader`] when absent
    #[serde(default)]
    pub size: Option<ImageSize>,
    /// Point to open on, in image pixels with a top-left origin
    #[serde(default)]
    pub focus: Option<Point>,
    /// Deepest pyramid level; present only for tiled views
    #[serde(default)]
    pub max_tile_zoom: Option<u8>,
}

impl View {
    pub fn new(id: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            locator: locator.into(),
            size: None,
            focus: None,
            max_tile_zoom: None,
        }
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_focus(mut self, focus: Point) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn tiled(mut self, max_tile_zoom: u8) -> Self {
        self.max_tile_zoom = Some(max_tile_zoom);
        self
    }

    pub fn is_tiled(&self) -> bool {
        self.max_tile_zoom.is_some()
    }
}

/// Ordered set of views with unique ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewCatalog {
    views: Vec<View>,
}

impl ViewCatalog {
    pub fn new(views: Vec<View>) -> Result<Self> {
        for (i, view) in views.iter().enumerate() {
            if views[..i].iter().any(|v| v.id == view.id) {
                return Err(MapError::Config(format!("duplicate view id '{}'", view.id)));
            }
        }
        Ok(Self { views })
    }

    pub fn get(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }

    pub fn first(&self) -> Option<&View> {
        self.views.first()
    }

    /// The view after `id`, wrapping around; with two views this toggles
    pub fn next_after(&self, id: &str) -> Option<&View> {
        let pos = self.views.iter().position(|v| v.id == id)?;
        self.views.get((pos + 1) % self.views.len())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.views.iter().map(|v| v.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// Proof that a switch was requested; only the newest ticket is honoured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    token: u64,
    view_id: String,
}

impl LoadTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn view_id(&self) -> &str {
        &self.view_id
    }
}

/// What happened to a completed load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Layer swapped in and view fitted. `start_zoom` is the zoom that was
    /// requested; the surface may snap it, see [`DisplaySurface::zoom`].
    Applied(FitResult),
    /// Layer swapped in, fit waits for a usable container size
    Deferred,
    /// A newer switch superseded this ticket; nothing changed
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    /// Layer attached, fit waits for a usable container size
    Deferred,
    /// Fitted, pan bounds not locked until layout is stable
    Fitted,
    /// Fitted with rigid pan bounds
    Locked,
    Failed,
}

struct ActiveView {
    view: View,
    image: ImageSize,
    layer_id: String,
    fit: Option<FitResult>,
}

pub struct ViewSession<S: DisplaySurface> {
    surface: S,
    catalog: ViewCatalog,
    fit_options: FitOptions,
    last_token: u64,
    pending: Option<LoadTicket>,
    active: Option<ActiveView>,
    state: SessionState,
    layout_stable: bool,
}

impl<S: DisplaySurface> ViewSession<S> {
    pub fn new(surface: S, catalog: ViewCatalog, fit_options: FitOptions) -> Self {
        Self {
            surface,
            catalog,
            fit_options,
            last_token: 0,
            pending: None,
            active: None,
            state: SessionState::Idle,
            layout_stable: false,
        }
    }

    pub fn from_config(surface: S, config: &ViewerConfig) -> Result<Self> {
        config.validate()?;
        let catalog = ViewCatalog::new(config.views.clone())?;
        Ok(Self::new(surface, catalog, config.fit.clone()))
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn catalog(&self) -> &ViewCatalog {
        &self.catalog
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The view currently on screen, with its natural size resolved
    pub fn active_view(&self) -> Option<&View> {
        self.active.as_ref().map(|a| &a.view)
    }

    pub fn current_fit(&self) -> Option<&FitResult> {
        self.active.as_ref().and_then(|a| a.fit.as_ref())
    }

    /// Begin switching to `view_id`. Any earlier ticket becomes stale.
    pub fn switch_view(&mut self, view_id: &str) -> Result<LoadTicket> {
        if self.catalog.get(view_id).is_none() {
            return Err(MapError::UnknownView(view_id.to_string()));
        }

        self.last_token += 1;
        let ticket = LoadTicket {
            token: self.last_token,
            view_id: view_id.to_string(),
        };
        if let Some(previous) = self.pending.replace(ticket.clone()) {
            log::debug!(
                "switch to {} supersedes pending load of {} (token {})",
                view_id,
                previous.view_id,
                previous.token
            );
        }
        self.state = SessionState::Loading;
        log::info!("switching to view {view_id} (token {})", ticket.token);
        Ok(ticket)
    }

    /// Cycle to the next declared view, or open the first one
    pub fn toggle(&mut self) -> Result<LoadTicket> {
        let current = self
            .pending
            .as_ref()
            .map(|t| t.view_id.clone())
            .or_else(|| self.active.as_ref().map(|a| a.view.id.clone()));

        let next = match current {
            Some(id) => self.catalog.next_after(&id),
            None => self.catalog.first(),
        }
        .map(|v| v.id.clone())
        .ok_or_else(|| MapError::Config("no views declared".to_string()))?;

        self.switch_view(&next)
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.pending.as_ref().map(|t| t.token) == Some(ticket.token)
    }

    /// Report the natural size of the asset loaded for `ticket`
    pub fn complete_load(&mut self, ticket: &LoadTicket, natural: ImageSize) -> Result<LoadOutcome> {
        if !self.is_current(ticket) {
            log::debug!(
                "dropping stale load of {} (token {})",
                ticket.view_id,
                ticket.token
            );
            return Ok(LoadOutcome::Stale);
        }
        self.pending = None;

        let view = self
            .catalog
            .get(&ticket.view_id)
            .cloned()
            .ok_or_else(|| MapError::UnknownView(ticket.view_id.clone()))?;

        let layer = match self.build_layer(&view, natural, ticket.token) {
            Ok(layer) => layer,
            Err(e) => {
                log::warn!("view {} has unusable dimensions: {e}", view.id);
                self.state = SessionState::Failed;
                return Err(e);
            }
        };

        // Tear down the previous view entirely before the new one goes in.
        if let Some(previous) = self.active.take() {
            self.surface.remove_layer(&previous.layer_id)?;
            self.surface.set_max_bounds(None, 0.0)?;
        }
        let layer_id = layer.id().to_string();
        self.surface.attach_layer(layer)?;

        self.active = Some(ActiveView {
            view: View {
                size: Some(natural),
                ..view
            },
            image: natural,
            layer_id,
            fit: None,
        });

        self.apply_initial_fit()
    }

    /// Report that the asset for `ticket` could not be loaded.
    /// Stale tickets are ignored; for the current one the view halts.
    pub fn fail_load(&mut self, ticket: &LoadTicket, reason: &str) -> Result<()> {
        if !self.is_current(ticket) {
            log::debug!("ignoring failure for stale load of {}", ticket.view_id);
            return Ok(());
        }
        self.pending = None;
        self.state = SessionState::Failed;

        let locator = self
            .catalog
            .get(&ticket.view_id)
            .map(|v| v.locator.clone())
            .unwrap_or_default();
        log::error!("failed to load view {} from {locator}: {reason}", ticket.view_id);
        Err(MapError::AssetLoad {
            locator,
            reason: reason.to_string(),
        })
    }

    /// Switch to a view whose size is declared, completing the load at once
    pub fn activate(&mut self, view_id: &str) -> Result<LoadOutcome> {
        let ticket = self.switch_view(view_id)?;
        let declared = self.catalog.get(view_id).and_then(|v| v.size);
        match declared {
            Some(size) => self.complete_load(&ticket, size),
            None => {
                self.fail_load(&ticket, "view has no declared size")?;
                Ok(LoadOutcome::Stale)
            }
        }
    }

    /// Switch to a view, probing its size through `loader` when undeclared
    pub async fn open(&mut self, view_id: &str, loader: &dyn ImageLoader) -> Result<LoadOutcome> {
        let ticket = self.switch_view(view_id)?;
        let view = self
            .catalog
            .get(view_id)
            .cloned()
            .ok_or_else(|| MapError::UnknownView(view_id.to_string()))?;

        let probed = match view.size {
            Some(size) => Ok(size),
            None if view.is_tiled() => Err(MapError::AssetLoad {
                locator: view.locator.clone(),
                reason: "tiled views must declare their size".to_string(),
            }),
            None => loader.probe(&view.locator).await,
        };

        match probed {
            Ok(size) => self.complete_load(&ticket, size),
            Err(e) => {
                self.fail_load(&ticket, &e.to_string())?;
                Ok(LoadOutcome::Stale)
            }
        }
    }

    /// Container layout has settled: fit if still pending and lock bounds
    pub fn layout_stable(&mut self) -> Result<()> {
        self.layout_stable = true;
        match self.active.as_ref().map(|a| a.fit.is_some()) {
            Some(false) => self.apply_initial_fit().map(|_| ()),
            Some(true) => self.refit().map(|_| ()),
            None => Ok(()),
        }
    }

    /// The container changed size: re-query it and redo min zoom and bounds
    pub fn resize(&mut self, size: ViewportSize) -> Result<Option<FitResult>> {
        self.surface.invalidate_size(size)?;
        // a resize is only delivered once the container has a real layout
        self.layout_stable = true;
        match self.active.as_ref().map(|a| a.fit.is_some()) {
            Some(false) => match self.apply_initial_fit()? {
                LoadOutcome::Applied(fit) => Ok(Some(fit)),
                _ => Ok(None),
            },
            Some(true) => self.refit().map(Some),
            None => Ok(None),
        }
    }

    /// Dispatch a UI trigger
    pub fn handle_input(&mut self, input: SessionInput) -> Result<Option<LoadTicket>> {
        match input {
            SessionInput::ToggleView => self.toggle().map(Some),
            SessionInput::SwitchView(id) => self.switch_view(&id).map(Some),
            SessionInput::Resize(size) => self.resize(size).map(|_| None),
            SessionInput::LayoutStable => self.layout_stable().map(|_| None),
        }
    }

    fn build_layer(&self, view: &View, natural: ImageSize, token: u64) -> Result<Box<dyn LayerTrait>> {
        natural.validate()?;
        let layer_id = format!("{}#{}", view.id, token);

        let layer: Box<dyn LayerTrait> = match view.max_tile_zoom {
            Some(max_level) => {
                let pyramid = TilePyramid::new(natural, max_level)?;
                Box::new(TileLayer::new(
                    layer_id,
                    Box::new(TemplateSource::new(view.locator.clone())),
                    pyramid,
                ))
            }
            None => {
                let bounds = ViewportFitCalculator::compute_bounds(natural, self.fit_options.axis)?;
                Box::new(ImageOverlay::new(layer_id, view.locator.clone(), bounds))
            }
        };
        Ok(layer)
    }

    fn compute_fit(&self, active: &ActiveView) -> Result<FitResult> {
        let surface_max = self.surface.max_zoom();
        let options = FitOptions {
            focus: active.view.focus,
            max_zoom: Some(
                self.fit_options
                    .max_zoom
                    .map_or(surface_max, |m| m.min(surface_max)),
            ),
            ..self.fit_options.clone()
        };

        match active.view.max_tile_zoom {
            Some(max_level) => TilePyramid::new(active.image, max_level)?.fit(self.surface.size(), &options),
            None => ViewportFitCalculator::fit(self.surface.size(), active.image, &options),
        }
    }

    /// Steps 2 to 4 for a freshly attached layer
    fn apply_initial_fit(&mut self) -> Result<LoadOutcome> {
        let Some(active) = self.active.as_ref() else {
            return Ok(LoadOutcome::Deferred);
        };

        let fit = match self.compute_fit(active) {
            Ok(fit) => fit,
            Err(MapError::InvalidInput(reason)) if self.surface.size().validate().is_err() => {
                log::debug!("deferring fit of {}: {reason}", active.view.id);
                self.settle(SessionState::Deferred);
                return Ok(LoadOutcome::Deferred);
            }
            Err(e) => {
                log::warn!("cannot fit view {}: {e}", active.view.id);
                self.settle(SessionState::Failed);
                return Err(e);
            }
        };

        // Lowering the limit first cannot move the current zoom, and keeps a
        // stricter limit left by the previous view from clamping the new view.
        if fit.cover_zoom < self.surface.min_zoom() {
            self.surface.set_min_zoom(fit.cover_zoom)?;
        }
        self.surface.set_view(fit.center, fit.start_zoom)?;
        self.surface.set_min_zoom(fit.cover_zoom)?;
        self.lock_bounds(&fit)?;

        if let Some(active) = self.active.as_mut() {
            active.fit = Some(fit.clone());
        }
        Ok(LoadOutcome::Applied(fit))
    }

    /// Steps 3 and 4 against the current container size
    fn refit(&mut self) -> Result<FitResult> {
        let Some(active) = self.active.as_ref() else {
            return Err(MapError::InvalidInput("no active view".to_string()));
        };
        let fit = self.compute_fit(active)?;

        self.surface.set_min_zoom(fit.cover_zoom)?;
        self.lock_bounds(&fit)?;

        if let Some(active) = self.active.as_mut() {
            active.fit = Some(fit.clone());
        }
        Ok(fit)
    }

    fn lock_bounds(&mut self, fit: &FitResult) -> Result<()> {
        if self.layout_stable {
            self.surface
                .set_max_bounds(Some(fit.bounds.clone()), RIGID_VISCOSITY)?;
            self.settle(SessionState::Locked);
        } else {
            self.settle(SessionState::Fitted);
        }
        Ok(())
    }

    /// Record where the active view ended up. A pending switch keeps the
    /// session in `Loading` until its ticket completes or fails.
    fn settle(&mut self, state: SessionState) {
        if self.pending.is_none() {
            self.state = state;
        }
    }
}
