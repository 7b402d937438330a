use std::sync::Arc;

use iced::widget::{button, column, container, image, row, text, Space};
use iced::{Alignment, Color, Element, Length, Task, Theme};
use rfd::FileDialog;
use tracing_subscriber::EnvFilter;

use metainfo_preview::metainfo::ColorScheme;
use metainfo_preview::state::config::PreviewConfig;
use metainfo_preview::state::data::PreviewState;
use metainfo_preview::state::session::{Commit, OpenTicket, Phase, Session};
use metainfo_preview::{PreviewError, Previewer};

mod ui;

/// Main application state
struct MetainfoPreview {
    /// Open-file state machine and the current preview
    session: Session,
    /// Runs the metainfo-to-preview pipeline
    previewer: Previewer,
    /// Screenshot of the current preview, uploaded once
    screenshot: Option<image::Handle>,
    /// Card background for the current scheme (None = theme background)
    card_background: Option<Color>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Open" button
    OpenFile,
    /// Background open finished (or failed)
    PreviewLoaded(OpenTicket, Result<PreviewState, Arc<PreviewError>>),
    /// User clicked the light/dark toggle
    ToggleColorScheme,
}

impl MetainfoPreview {
    fn new(previewer: Previewer) -> (Self, Task<Message>) {
        (
            MetainfoPreview {
                session: Session::default(),
                previewer,
                screenshot: None,
                card_background: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFile => {
                let ticket = self.session.begin_open();

                let file = FileDialog::new()
                    .set_title("Open Metainfo File")
                    .add_filter("Metainfo", &["xml", "in"])
                    .pick_file();

                let Some(path) = file else {
                    // Dismissed dialog goes back to the welcome page
                    self.session.cancel(&ticket);
                    self.clear_preview();
                    return Task::none();
                };

                tracing::info!(path = %path.display(), "opening metainfo file");
                self.clear_preview();

                let previewer = self.previewer.clone();
                let scheme = self.session.color_scheme();
                let job_ticket = ticket.clone();
                Task::perform(
                    async move {
                        previewer
                            .open_descriptor(path, &job_ticket, scheme)
                            .await
                            .map_err(Arc::new)
                    },
                    move |result| Message::PreviewLoaded(ticket.clone(), result),
                )
            }
            Message::PreviewLoaded(ticket, result) => {
                match self.session.complete(&ticket, result) {
                    Commit::Shown => {
                        if let Some(preview) = self.session.preview() {
                            let handle = ui::card::screenshot_handle(&preview.screenshot);
                            self.screenshot = Some(handle);
                            self.card_background = ui::card::background_color(preview);
                        }
                    }
                    Commit::Reset => self.clear_preview(),
                    Commit::Discarded => {}
                }
                Task::none()
            }
            Message::ToggleColorScheme => {
                let background = self.session.toggle_color_scheme();
                tracing::debug!(
                    scheme = ?self.session.color_scheme(),
                    %background,
                    "color scheme toggled"
                );
                self.card_background = self.session.preview().and_then(ui::card::background_color);
                Task::none()
            }
        }
    }

    fn clear_preview(&mut self) {
        self.screenshot = None;
        self.card_background = None;
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let scheme_label = match self.session.color_scheme() {
            ColorScheme::Light => "Dark",
            ColorScheme::Dark => "Light",
        };

        let subtitle = self
            .session
            .preview()
            .map(|preview| preview.subtitle.as_str())
            .unwrap_or("");

        let header = row![
            button("Open").on_press(Message::OpenFile).padding(10),
            Space::with_width(Length::Fill),
            column![text("Metainfo Preview").size(16), text(subtitle).size(12)]
                .align_x(Alignment::Center),
            Space::with_width(Length::Fill),
            button(scheme_label)
                .on_press(Message::ToggleColorScheme)
                .padding(10),
        ]
        .spacing(10)
        .padding(10)
        .align_y(Alignment::Center);

        let body: Element<Message> = match self.session.phase() {
            Phase::Idle => centered(
                column![
                    text("Metainfo Preview").size(48),
                    text("Open a metainfo file to see how its app card looks").size(16),
                    button("Open File").on_press(Message::OpenFile).padding(10),
                ]
                .spacing(20)
                .align_x(Alignment::Center)
                .into(),
            ),
            Phase::Loading => centered(text("Loading…").size(24).into()),
            Phase::Content(preview) => {
                ui::card::view(preview, self.screenshot.as_ref(), self.card_background)
            }
        };

        column![header, body].into()
    }

    /// Follow the session's color scheme
    fn theme(&self) -> Theme {
        match self.session.color_scheme() {
            ColorScheme::Light => Theme::Light,
            ColorScheme::Dark => Theme::Dark,
        }
    }
}

fn centered(content: Element<Message>) -> Element<Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match PreviewConfig::default_path() {
        Some(path) => PreviewConfig::load(&path)?,
        None => PreviewConfig::default(),
    };
    let previewer = Previewer::new(config)?;

    iced::application(
        "Metainfo Preview",
        MetainfoPreview::update,
        MetainfoPreview::view,
    )
    .theme(MetainfoPreview::theme)
    .centered()
    .run_with(move || MetainfoPreview::new(previewer.clone()))?;

    Ok(())
}
