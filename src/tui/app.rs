use std::future::Future;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Frame, Terminal};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::api::{ApiError, CmsClient};
use crate::model::{EntityKind, Record};
use crate::session::{FormSession, SubmitBlocked, SubmitState};

use super::action::Action;
use super::error::AppError;
use super::screens::{
    EditorState, HelpState, HomeState, OpenRecordState, draw_editor, draw_help, draw_home,
    draw_open_record,
};

/// How long the loop waits for a key before checking for completed requests.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Choose what to create or update.
    Home,
    /// Enter the id of a record to update.
    OpenRecord,
    /// Edit one record.
    Editor,
    /// Show keybinding help.
    Help,
}

impl Screen {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::OpenRecord => "Open Record",
            Self::Editor => "Editor",
            Self::Help => "Help",
        }
    }
}

/// The outcome of a background request.
#[derive(Debug)]
pub enum Completion {
    Fetched(Result<Record, ApiError>),
    Uploaded(Result<String, ApiError>),
    Submitted(Result<(), ApiError>),
}

/// A [`Completion`] tagged with the serial of the screen that started it.
#[derive(Debug)]
pub struct Tagged {
    pub serial: u64,
    pub completion: Completion,
}

/// Top-level application state.
pub struct App {
    screen: Screen,
    client: CmsClient,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Tagged>,
    rx: mpsc::UnboundedReceiver<Tagged>,
    /// Serial of the open prompt or editor; bumped whenever one is opened.
    serial: u64,
    home: HomeState,
    open_record: Option<OpenRecordState>,
    editor: Option<EditorState>,
    help: HelpState,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` starting on the [`Screen::Home`] screen.
    ///
    /// Requests run as tasks on `runtime`.
    pub fn new(client: CmsClient, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            screen: Screen::Home,
            client,
            runtime,
            tx,
            rx,
            serial: 0,
            home: HomeState::new(),
            open_record: None,
            editor: None,
            help: HelpState::new(),
            should_quit: false,
        }
    }

    /// Main event loop: draw → apply completed requests → poll for a key → dispatch.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.drain_completions();
            if event::poll(POLL_INTERVAL)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Renders the current screen.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        match self.screen {
            Screen::Home => draw_home(&self.home, frame, area),
            Screen::OpenRecord => {
                if let Some(state) = &self.open_record {
                    draw_open_record(state, frame, area);
                }
            }
            Screen::Editor => {
                if let Some(state) = self.editor.as_mut() {
                    draw_editor(state, frame, area);
                }
            }
            Screen::Help => draw_help(&self.help, frame, area),
        }
    }

    /// Handles a key event: global keys first, then screen-specific.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::F(1) {
            if self.screen != Screen::Help {
                self.help.set_origin(self.screen);
                self.help.reset();
                self.screen = Screen::Help;
            }
            return;
        }

        let action = match self.screen {
            Screen::Home => self.home.handle_key(key),
            Screen::OpenRecord => self
                .open_record
                .as_mut()
                .map_or(Action::None, |s| s.handle_key(key)),
            Screen::Editor => self
                .editor
                .as_mut()
                .map_or(Action::None, |s| s.handle_key(key)),
            Screen::Help => self.help.handle_key(key),
        };
        self.apply(action);
    }

    /// Applies a screen action.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(Screen::Home) => {
                if let Some(editor) = self.editor.take() {
                    let session = editor.session();
                    if session.uploading() || *session.state() == SubmitState::Submitting {
                        self.home.set_notice(format!(
                            "Left the {} form; its pending request will be ignored.",
                            session.kind().label()
                        ));
                    }
                }
                self.open_record = None;
                self.screen = Screen::Home;
            }
            Action::Navigate(screen) => self.screen = screen,
            Action::OpenCreate(kind) => self.open_create(kind),
            Action::PromptRecord(kind) => {
                self.serial += 1;
                self.open_record = Some(OpenRecordState::new(kind));
                self.screen = Screen::OpenRecord;
            }
            Action::FetchRecord(kind, id) => {
                let client = self.client.clone();
                spawn_tagged(&self.runtime, &self.tx, self.serial, async move {
                    Completion::Fetched(client.fetch(kind, &id).await)
                });
            }
            Action::Upload => self.start_upload(),
            Action::Submit => self.start_submit(),
            Action::Quit => self.should_quit = true,
        }
    }

    /// Applies every request that has completed since the last call.
    pub fn drain_completions(&mut self) {
        while let Ok(tagged) = self.rx.try_recv() {
            self.apply_completion(tagged);
        }
    }

    /// Applies one completed request, unless its screen has since been closed.
    pub fn apply_completion(&mut self, tagged: Tagged) {
        let Tagged { serial, completion } = tagged;
        match completion {
            Completion::Fetched(result) => {
                let Some(prompt) = self.open_record.as_mut().filter(|_| serial == self.serial)
                else {
                    warn!(serial, "discarding fetch result for a closed prompt");
                    return;
                };
                match result {
                    Ok(record) => self.open_update(&record),
                    Err(e) => {
                        error!(kind = %prompt.kind(), error = %e, "fetch failed");
                        prompt.fail(e.to_string());
                    }
                }
            }
            Completion::Uploaded(result) => match self.editor.as_mut() {
                Some(editor) if editor.serial() == serial => {
                    editor.session_mut().finish_upload(result);
                }
                _ => warn!(serial, "discarding upload result for a closed editor"),
            },
            Completion::Submitted(result) => match self.editor.as_mut() {
                Some(editor) if editor.serial() == serial => {
                    let (session, body) = editor.parts_mut();
                    session.finish_submit(result, body);
                }
                _ => warn!(serial, "discarding submission result for a closed editor"),
            },
        }
    }

    fn open_create(&mut self, kind: EntityKind) {
        self.serial += 1;
        let session = FormSession::create(kind, self.client.config());
        self.editor = Some(EditorState::create(session, self.serial));
        self.screen = Screen::Editor;
    }

    fn open_update(&mut self, record: &Record) {
        self.serial += 1;
        let session = FormSession::update(record, self.client.config());
        self.editor = Some(EditorState::update(session, record, self.serial));
        self.open_record = None;
        match self.screen {
            Screen::OpenRecord => self.screen = Screen::Editor,
            // Help stays up; closing it lands on the new editor.
            Screen::Help => self.help.set_origin(Screen::Editor),
            Screen::Home | Screen::Editor => {}
        }
    }

    fn start_upload(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match editor.session_mut().begin_upload() {
            Ok(path) => {
                let client = self.client.clone();
                spawn_tagged(&self.runtime, &self.tx, editor.serial(), async move {
                    Completion::Uploaded(client.upload_image(&path).await)
                });
            }
            Err(blocked) => editor.set_notice(blocked.to_string()),
        }
    }

    fn start_submit(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let serial = editor.serial();
        let (session, body) = editor.parts_mut();
        match session.begin_submit(&*body) {
            Ok(submission) => {
                let client = self.client.clone();
                spawn_tagged(&self.runtime, &self.tx, serial, async move {
                    Completion::Submitted(submission.send(&client).await)
                });
            }
            Err(blocked @ SubmitBlocked::Invalid(_)) => {
                editor.focus_first_error();
                editor.set_notice(blocked.to_string());
            }
            Err(blocked) => editor.set_notice(blocked.to_string()),
        }
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the open editor, if any.
    pub fn editor(&self) -> Option<&EditorState> {
        self.editor.as_ref()
    }

    /// Returns the open record prompt, if any.
    pub fn open_record(&self) -> Option<&OpenRecordState> {
        self.open_record.as_ref()
    }
}

/// Runs `work` on the runtime and sends its result back to the UI loop.
fn spawn_tagged<F>(runtime: &Handle, tx: &mpsc::UnboundedSender<Tagged>, serial: u64, work: F)
where
    F: Future<Output = Completion> + Send + 'static,
{
    let tx = tx.clone();
    runtime.spawn(async move {
        let completion = work.await;
        // The receiver is only gone once the app has quit.
        let _ = tx.send(Tagged { serial, completion });
    });
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::{Config, Endpoints};

    fn config(base: &str) -> Config {
        Config {
            base_url: base.to_string(),
            admin_token: "secret".into(),
            endpoints: Endpoints {
                club: "/api/v1/sport_clubs/".into(),
                event: "/api/v1/events/".into(),
                news: "/api/v1/news/".into(),
            },
            image_upload_url: format!("{base}/upload"),
            image_base_url: "https://cdn.example/".into(),
            request_timeout: None,
        }
    }

    fn make_app(runtime: &tokio::runtime::Runtime) -> App {
        let client = CmsClient::new(config("https://api.example")).unwrap();
        App::new(client, runtime.handle().clone())
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn type_string(app: &mut App, s: &str) {
        for ch in s.chars() {
            app.handle_key(press(KeyCode::Char(ch)));
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn new_starts_on_home() {
            let rt = runtime();
            let app = make_app(&rt);
            assert_eq!(app.screen(), Screen::Home);
            assert!(!app.should_quit());
            assert!(app.editor().is_none());
        }

        #[test]
        fn q_on_home_quits() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.handle_key(press(KeyCode::Char('q')));
            assert!(app.should_quit());
        }

        #[test]
        fn release_events_are_ignored() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.handle_key(release(KeyCode::Char('q')));
            assert!(!app.should_quit());
        }

        #[test]
        fn enter_opens_create_editor() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.handle_key(press(KeyCode::Enter));
            assert_eq!(app.screen(), Screen::Editor);
            assert_eq!(app.editor().unwrap().session().kind(), EntityKind::Club);
        }

        #[test]
        fn update_entry_opens_prompt() {
            let rt = runtime();
            let mut app = make_app(&rt);
            for _ in 0..4 {
                app.handle_key(press(KeyCode::Down));
            }
            app.handle_key(press(KeyCode::Enter));
            assert_eq!(app.screen(), Screen::OpenRecord);
            assert_eq!(app.open_record().unwrap().kind(), EntityKind::Event);
        }

        #[test]
        fn esc_from_editor_closes_it() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.handle_key(press(KeyCode::Enter));
            app.handle_key(press(KeyCode::Esc));
            assert_eq!(app.screen(), Screen::Home);
            assert!(app.editor().is_none());
        }

        #[test]
        fn f1_opens_help_and_returns_to_origin() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.handle_key(press(KeyCode::Enter));
            type_string(&mut app, "Ballers");
            app.handle_key(press(KeyCode::F(1)));
            assert_eq!(app.screen(), Screen::Help);

            app.handle_key(press(KeyCode::Esc));
            assert_eq!(app.screen(), Screen::Editor);
            assert_eq!(
                app.editor().unwrap().session().values().text("sport_name"),
                "Ballers"
            );
        }

        #[test]
        fn screen_labels_match_expected() {
            let expected = [
                (Screen::Home, "Home"),
                (Screen::OpenRecord, "Open Record"),
                (Screen::Editor, "Editor"),
                (Screen::Help, "Help"),
            ];
            for (screen, label) in expected {
                assert_eq!(screen.label(), label, "{screen:?} label mismatch");
            }
        }
    }

    mod gating {
        use super::*;

        #[test]
        fn invalid_submit_sets_notice_and_errors() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.handle_key(press(KeyCode::Enter));
            app.apply(Action::Submit);
            let editor = app.editor().unwrap();
            assert!(editor.notice().is_some());
            assert!(editor.session().error("sport_name").is_some());
            assert_eq!(editor.session().state(), &SubmitState::Idle);
        }

        #[test]
        fn upload_without_path_sets_notice() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.handle_key(press(KeyCode::Enter));
            app.apply(Action::Upload);
            assert_eq!(
                app.editor().unwrap().notice(),
                Some("enter the path of an image file first")
            );
        }
    }

    mod completions {
        use super::*;

        #[test]
        fn leaving_with_pending_upload_sets_home_notice() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.apply(Action::OpenCreate(EntityKind::News));
            let editor = app.editor.as_mut().unwrap();
            editor.session_mut().set_file_input("/tmp/draw.png");
            editor.session_mut().begin_upload().unwrap();
            app.apply(Action::Navigate(Screen::Home));
            assert_eq!(
                app.home.notice(),
                Some("Left the News form; its pending request will be ignored.")
            );
        }

        #[test]
        fn stale_upload_result_is_discarded() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.apply(Action::OpenCreate(EntityKind::News));
            let first = app.editor().unwrap().serial();
            app.apply(Action::Navigate(Screen::Home));
            app.apply(Action::OpenCreate(EntityKind::News));

            app.apply_completion(Tagged {
                serial: first,
                completion: Completion::Uploaded(Ok("stale.png".into())),
            });
            assert_eq!(
                app.editor().unwrap().session().values().text("thumbnail"),
                ""
            );
        }

        #[test]
        fn fetch_result_for_closed_prompt_is_discarded() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.apply(Action::PromptRecord(EntityKind::News));
            app.apply(Action::Navigate(Screen::Home));
            app.apply_completion(Tagged {
                serial: 1,
                completion: Completion::Fetched(Err(ApiError::MissingFileId)),
            });
            assert_eq!(app.screen(), Screen::Home);
            assert!(app.open_record().is_none());
        }

        #[test]
        fn fetch_failure_shows_on_prompt() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.apply(Action::PromptRecord(EntityKind::News));
            let serial = app.serial;
            app.apply_completion(Tagged {
                serial,
                completion: Completion::Fetched(Err(ApiError::Status {
                    status: 404,
                    body: "missing".into(),
                })),
            });
            assert_eq!(
                app.open_record().unwrap().error(),
                Some("server responded 404: missing")
            );
        }
    }

    mod fetched_while_in_help {
        use super::*;
        use crate::model::NewsRecord;

        fn fetched(app: &App) -> Tagged {
            Tagged {
                serial: app.serial,
                completion: Completion::Fetched(Ok(Record::News(NewsRecord {
                    id: "9".into(),
                    title: "Cup draw".into(),
                    slug: "cup-draw".into(),
                    ..NewsRecord::default()
                }))),
            }
        }

        #[test]
        fn help_stays_open_and_returns_to_editor() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.apply(Action::PromptRecord(EntityKind::News));
            app.handle_key(press(KeyCode::F(1)));
            assert_eq!(app.screen(), Screen::Help);

            let tagged = fetched(&app);
            app.apply_completion(tagged);
            assert_eq!(app.screen(), Screen::Help);
            assert!(app.editor().is_some());
            assert!(app.open_record().is_none());

            app.handle_key(press(KeyCode::Esc));
            assert_eq!(app.screen(), Screen::Editor);
            assert_eq!(
                app.editor().unwrap().session().mode().record_id(),
                Some("9")
            );
        }

        #[test]
        fn prompt_switches_straight_to_editor() {
            let rt = runtime();
            let mut app = make_app(&rt);
            app.apply(Action::PromptRecord(EntityKind::News));
            let tagged = fetched(&app);
            app.apply_completion(tagged);
            assert_eq!(app.screen(), Screen::Editor);
        }
    }

    mod over_http {
        use super::*;

        async fn next(app: &mut App) {
            let tagged = app.rx.recv().await.unwrap();
            app.apply_completion(tagged);
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn fetch_opens_update_editor() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/api/v1/news/42/"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "id": 42,
                    "title": "Cup draw",
                    "slug": "cup-draw",
                    "thumbnail": "draw.png",
                    "body": "<p>Tonight</p>",
                    "is_draft": false
                })))
                .mount(&server)
                .await;

            let client = CmsClient::new(config(&server.uri())).unwrap();
            let mut app = App::new(client, Handle::current());
            app.apply(Action::PromptRecord(EntityKind::News));
            type_string(&mut app, "42");
            app.handle_key(press(KeyCode::Enter));
            next(&mut app).await;

            assert_eq!(app.screen(), Screen::Editor);
            let editor = app.editor().unwrap();
            assert_eq!(editor.session().mode().record_id(), Some("42"));
            assert_eq!(editor.body().lines(), ["Tonight"]);
            assert_eq!(
                editor.session().preview(),
                Some("https://cdn.example/draw.png")
            );
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn upload_and_submit_through_the_loop() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/upload"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"data": {"file": "abc123.png"}})),
                )
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/api/v1/news/"))
                .respond_with(ResponseTemplate::new(201))
                .expect(1)
                .mount(&server)
                .await;

            let dir = tempfile::tempdir().unwrap();
            let file = dir.path().join("draw.png");
            std::fs::File::create(&file)
                .unwrap()
                .write_all(b"png")
                .unwrap();

            let client = CmsClient::new(config(&server.uri())).unwrap();
            let mut app = App::new(client, Handle::current());
            app.apply(Action::OpenCreate(EntityKind::News));
            type_string(&mut app, "Cup draw");
            {
                let (session, body) = app.editor.as_mut().unwrap().parts_mut();
                session.set_file_input(file.to_string_lossy());
                body.input(press(KeyCode::Char('x')));
            }

            app.apply(Action::Upload);
            assert!(app.editor().unwrap().session().uploading());
            next(&mut app).await;
            assert_eq!(
                app.editor().unwrap().session().values().text("thumbnail"),
                "abc123.png"
            );

            app.apply(Action::Submit);
            app.apply(Action::Submit);
            assert_eq!(
                app.editor().unwrap().notice(),
                Some("a submission is already in progress")
            );
            next(&mut app).await;
            assert_eq!(
                app.editor().unwrap().session().state(),
                &SubmitState::Succeeded
            );
            assert_eq!(
                app.editor().unwrap().session().values().text("title"),
                ""
            );
        }
    }
}
