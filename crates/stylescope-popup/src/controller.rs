//! Popup state and the requests it sends to the background.
//!
//! The controller owns everything the popup shows: the page it was opened
//! on, the last analysis, the last picked element and whether a pick is in
//! progress. It talks to the background only through a [`BackgroundPort`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stylescope_background::BackgroundHandle;
use stylescope_config::ExportConfig;
use stylescope_protocols::policy::{self, PageKind};
use stylescope_protocols::{
    AnalysisResult, ColorFormat, ColorSummary, CommandError, DeliveryError, ElementSnapshot,
    Message, Response, TabInfo,
};
use tracing::{debug, info, warn};

use crate::export::{self, ExportError};

/// Request channel from the popup to the background context.
#[async_trait]
pub trait BackgroundPort: Send + Sync {
    async fn request(&self, message: Message) -> Result<Response, DeliveryError>;
}

#[async_trait]
impl BackgroundPort for BackgroundHandle {
    async fn request(&self, message: Message) -> Result<Response, DeliveryError> {
        BackgroundHandle::request(self, message).await
    }
}

/// Page the popup was opened on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub url: String,
    pub title: String,
    pub is_restricted: bool,
    pub is_valid_web_page: bool,
    pub is_local_dev: bool,
    pub page_kind: PageKind,
}

impl PageInfo {
    pub fn from_tab(tab: &TabInfo) -> Self {
        let url = tab.url_or_empty().to_string();
        let is_restricted = policy::is_restricted(&url);
        Self {
            title: tab.title.clone().unwrap_or_default(),
            is_valid_web_page: policy::can_execute(&url),
            is_local_dev: policy::is_local_dev(&url),
            page_kind: policy::page_kind(&url),
            is_restricted,
            url,
        }
    }

    /// Fallback when the active tab could not be read.
    pub fn unknown() -> Self {
        Self {
            url: "unknown".to_string(),
            title: String::new(),
            is_restricted: true,
            is_valid_web_page: false,
            is_local_dev: false,
            page_kind: PageKind::Unknown,
        }
    }

    /// Explanation shown instead of the analysis on restricted pages.
    pub fn restriction_message(&self) -> Option<String> {
        self.is_restricted.then(|| policy::restriction_message(&self.url))
    }
}

/// Popup tab strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Overview,
    Element,
    Export,
}

/// Popup state for one opening of the popup.
pub struct PopupController<B: BackgroundPort> {
    port: B,
    export: ExportConfig,
    page: Option<PageInfo>,
    analysis: Option<AnalysisResult>,
    element: Option<ElementSnapshot>,
    picking: bool,
    view: View,
    color_format: ColorFormat,
    last_error: Option<String>,
}

impl<B: BackgroundPort> PopupController<B> {
    pub fn new(port: B, export: ExportConfig) -> Self {
        Self {
            port,
            export,
            page: None,
            analysis: None,
            element: None,
            picking: false,
            view: View::default(),
            color_format: ColorFormat::default(),
            last_error: None,
        }
    }

    pub fn page(&self) -> Option<&PageInfo> {
        self.page.as_ref()
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn element(&self) -> Option<&ElementSnapshot> {
        self.element.as_ref()
    }

    pub fn is_picking(&self) -> bool {
        self.picking
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn color_format(&self) -> ColorFormat {
        self.color_format
    }

    pub fn set_color_format(&mut self, format: ColorFormat) {
        self.color_format = format;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Record the page the popup opened on, then analyze it unless it is
    /// restricted.
    pub async fn load_page(&mut self, tab: Option<TabInfo>) -> &PageInfo {
        let info = match tab {
            Some(tab) => PageInfo::from_tab(&tab),
            None => {
                warn!("Active tab unavailable, treating page as restricted");
                PageInfo::unknown()
            }
        };
        info!(url = %info.url, restricted = info.is_restricted, kind = ?info.page_kind, "Popup opened");
        self.last_error = info.restriction_message();
        let restricted = info.is_restricted;
        self.page = Some(info);

        if !restricted {
            self.analyze().await;
        }
        self.page.get_or_insert_with(PageInfo::unknown)
    }

    /// Request a style analysis of the current page.
    ///
    /// Any failure leaves an empty result behind. A restricted reply also
    /// marks the page restricted.
    pub async fn analyze(&mut self) -> &AnalysisResult {
        if self.page_restricted() {
            debug!("Analysis skipped on restricted page");
            return self.analysis.insert(AnalysisResult::empty());
        }

        let result = match self.port.request(Message::AnalyzeStyles).await {
            Ok(response) if response.is_restricted() => {
                self.mark_restricted(response);
                AnalysisResult::empty()
            }
            Ok(response) if response.is_success() => {
                self.last_error = None;
                response.data.unwrap_or_default()
            }
            Ok(response) => {
                let message = response.error.unwrap_or_else(|| "Analysis failed".to_string());
                warn!(%message, "Analysis failed");
                self.last_error = Some(message);
                AnalysisResult::empty()
            }
            Err(err) => {
                warn!(error = %err, "Background unreachable");
                self.last_error = Some(err.to_string());
                AnalysisResult::empty()
            }
        };
        debug!(colors = result.colors.len(), fonts = result.fonts.len(), "Analysis stored");
        self.analysis.insert(result)
    }

    /// Start a pick on the current page. Returns whether the picker is live.
    pub async fn activate_picker(&mut self) -> bool {
        if self.page_restricted() {
            self.last_error = self.page.as_ref().and_then(PageInfo::restriction_message);
            return false;
        }

        self.picking = true;
        self.element = None;

        match self.port.request(Message::ActivatePicker).await {
            Ok(response) if response.is_restricted() => {
                self.picking = false;
                self.mark_restricted(response);
                false
            }
            Ok(response) if response.is_success() => {
                info!("Picker active");
                self.last_error = None;
                true
            }
            Ok(response) => {
                let message = response
                    .error
                    .unwrap_or_else(|| "Failed to activate picker".to_string());
                warn!(%message, "Picker activation failed");
                self.picking = false;
                self.last_error = Some(message);
                false
            }
            Err(err) => {
                warn!(error = %err, "Picker activation failed");
                self.picking = false;
                self.last_error = Some(err.to_string());
                false
            }
        }
    }

    /// The background refused the page; block further actions on it.
    fn mark_restricted(&mut self, response: Response) {
        let url = response.url.unwrap_or_default();
        let message = response
            .error
            .unwrap_or_else(|| policy::restriction_message(&url));
        warn!(%message, "Page is restricted");
        if let Some(page) = self.page.as_mut() {
            page.is_restricted = true;
            page.is_valid_web_page = false;
        }
        self.last_error = Some(message);
    }

    /// Handle a message forwarded by the background.
    pub fn handle_event(&mut self, message: &Message) -> Response {
        match message {
            Message::ElementSelected { data } => {
                debug!(element = %data.selector_label(), "Element received");
                self.element = Some(data.clone());
                self.picking = false;
                self.view = View::Element;
                Response::ok()
            }
            Message::PickerDeactivated => {
                self.picking = false;
                Response::ok()
            }
            other => {
                debug!(kind = other.kind(), "Ignoring message in popup");
                Response::error(CommandError::UnknownMessage(other.kind().to_string()).to_string())
            }
        }
    }

    /// `color` in the selected display format.
    pub fn color_value(&self, color: &ColorSummary) -> String {
        color_value(color, self.color_format)
    }

    /// Theme extension built from the last analysis.
    pub fn tailwind_config(&self) -> Result<String, ExportError> {
        let analysis = self
            .analysis
            .as_ref()
            .filter(|analysis| !analysis.is_empty())
            .ok_or(ExportError::NothingToExport)?;
        export::render(analysis, &self.export.key_prefix)
    }

    /// Write the theme extension into `dir`.
    pub fn export_config(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let contents = self.tailwind_config()?;
        export::write_config(dir, &self.export.file_name, &contents)
    }

    fn page_restricted(&self) -> bool {
        self.page.as_ref().is_some_and(|page| page.is_restricted)
    }
}

/// Render `color` in `format`, recomputed from its hex value.
pub fn color_value(color: &ColorSummary, format: ColorFormat) -> String {
    format.render(&color.hex)
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
