//! Bridge between map interaction and the [`MarkerStore`].
//!
//! [`MarkerSync`] reacts to [`UiEvent`]s from a front-end. Store mutations are always followed by
//! a full redraw: the overlay is cleared and every stored marker is drawn again, then the list is
//! re-rendered from the same snapshot.

use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::{
    Error, Result,
    banner::BannerSlot,
    config::CoreConfig,
    marker::{Marker, MarkerId},
    projection::{Converter, Geographic, Projected},
    share::{Share, ShareError, SharePayload},
    storage::Persistence,
    store::MarkerStore,
    view::{ListModel, ListRenderer},
};

mod prompt;
mod surface;

pub use prompt::DescriptionPrompt;
pub use surface::{MapSurface, PointStyle};

const DESCRIPTION_QUESTION: &str = "Marker description:";

/// Input from the front-end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    Click(Geographic),
    PointerMove(Geographic),
    /// The delete action of a list entry
    Delete(MarkerId),
}

/// Front-end collaborators driven by [`MarkerSync`].
pub struct Frontend<M, L, D, S> {
    pub surface: M,
    pub list: L,
    pub prompt: D,
    pub share: S,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    pub default_description: String,
    pub prompt_timeout: Duration,
    pub style: PointStyle,
    /// Title and url of share payloads, `None` disables sharing
    pub share: Option<(String, String)>,
    pub banner_interval: Duration,
}

impl From<&CoreConfig> for SyncSettings {
    fn from(cfg: &CoreConfig) -> Self {
        Self {
            default_description: cfg.markers.default_description.clone(),
            prompt_timeout: cfg.markers.prompt_timeout(),
            style: cfg.style.clone(),
            share: cfg
                .share
                .enabled
                .then(|| (cfg.share.title.clone(), cfg.share.url.clone())),
            banner_interval: cfg.banner.interval(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from(&CoreConfig::default())
    }
}

pub struct MarkerSync<P, M, L, D, S> {
    store: MarkerStore<P>,
    /// `None` when the projection could not be configured
    converter: Option<Box<dyn Converter>>,
    frontend: Frontend<M, L, D, S>,
    settings: SyncSettings,
    banner: BannerSlot,
}

impl<P, M, L, D, S> MarkerSync<P, M, L, D, S>
where
    P: Persistence,
    M: MapSurface,
    L: ListRenderer,
    D: DescriptionPrompt,
    S: Share,
{
    /// Create the controller. A converter that failed to initialize leaves the controller usable
    /// without coordinate conversion and puts an error on the banner.
    pub fn new(
        store: MarkerStore<P>,
        converter: Result<Box<dyn Converter>>,
        frontend: Frontend<M, L, D, S>,
        settings: SyncSettings,
    ) -> Self {
        let mut banner = BannerSlot::new(settings.banner_interval);

        let converter = match converter {
            Ok(converter) => Some(converter),
            Err(e) => {
                error!("SK-42 setup failed: {e}");
                banner.show("Failed to configure SK-42");
                None
            }
        };

        Self {
            store,
            converter,
            frontend,
            settings,
            banner,
        }
    }

    /// Draw the stored markers for the first time.
    pub fn init(&mut self) {
        self.redraw();
    }

    /// Dispatch a front-end event. Failures end up on the banner or in the log.
    ///
    /// Must run inside a tokio runtime with the time driver enabled, the description prompt is
    /// bounded by a tokio timer.
    pub async fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Click(position) => {
                // Already reported
                let _ = self.on_click(position).await;
            }
            UiEvent::PointerMove(position) => self.on_pointer_move(position),
            UiEvent::Delete(id) => {
                let _ = self.delete_marker(id);
            }
        }
    }

    /// Create a marker at `position`, then redraw and offer to share it.
    pub async fn on_click(&mut self, position: Geographic) -> Result<Marker> {
        let projected = match self.project(position) {
            Ok(projected) => projected,
            Err(e) => {
                error!("Marker creation failed: {e}");
                self.banner.show("Failed to add marker");
                return Err(e);
            }
        };

        let description = self.ask_description().await;
        let id = MarkerId::fresh(Utc::now(), &self.store.load_all());
        let marker = Marker::new(id, position, projected, description);

        if let Err(e) = self.store.append(marker.clone()) {
            error!("Save marker failed: {e}");
            self.banner.show("Failed to save marker");
            return Err(e);
        }

        self.redraw();
        self.share(&marker).await;

        Ok(marker)
    }

    /// Update the coordinate readout. Positions that can't be converted are skipped.
    pub fn on_pointer_move(&mut self, position: Geographic) {
        match self.project(position) {
            Ok(projected) => self
                .frontend
                .surface
                .show_readout(&format!("SK-42 {projected}")),
            Err(e) => debug!("Skipping readout for {position:?}: {e}"),
        }
    }

    pub fn delete_marker(&mut self, id: MarkerId) -> Result<()> {
        if let Err(e) = self.store.delete_by_id(id) {
            error!("Delete marker failed: {e}");
            self.banner.show("Failed to delete marker");
            return Err(e);
        }

        self.redraw();

        Ok(())
    }

    /// The error message currently on display, if any
    pub fn banner(&self) -> Option<&str> {
        self.banner.current()
    }

    pub fn store(&self) -> &MarkerStore<P> {
        &self.store
    }

    pub fn frontend(&self) -> &Frontend<M, L, D, S> {
        &self.frontend
    }

    fn project(&self, position: Geographic) -> Result<Projected> {
        self.converter
            .as_ref()
            .ok_or(Error::ConverterUnavailable)?
            .project(position)
    }

    async fn ask_description(&self) -> String {
        let answer = timeout(
            self.settings.prompt_timeout,
            self.frontend.prompt.ask(DESCRIPTION_QUESTION),
        )
        .await;

        match answer {
            Ok(Some(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => self.settings.default_description.clone(),
            Err(_) => {
                debug!("Description prompt timed out");
                self.settings.default_description.clone()
            }
        }
    }

    /// Rebuild the overlay and the list from the stored collection.
    fn redraw(&mut self) {
        let markers = self.store.load_all();

        let surface = &mut self.frontend.surface;
        surface.clear_overlay();
        for marker in &markers {
            surface.add_overlay_point(marker.position(), &self.settings.style);
        }

        self.frontend.list.render(&ListModel::from_markers(&markers));

        debug!("Markers drawn: {}", markers.len());
    }

    async fn share(&self, marker: &Marker) {
        let Some((title, url)) = &self.settings.share else {
            return;
        };

        let payload = SharePayload::for_marker(marker, title, url);
        match self.frontend.share.share(&payload).await {
            Ok(()) => debug!("Shared marker {}", marker.id),
            Err(ShareError::Unsupported) => warn!("Sharing is not supported"),
            Err(e) => warn!("Share failed: {e}"),
        }
    }
}

#[cfg(test)]
mod test {
    use std::{
        cell::RefCell,
        future::{self, Future},
        io,
        rc::Rc,
    };

    use super::*;
    use crate::{
        projection::{ProjectionParams, Sk42Converter},
        storage::MemoryStorage,
    };

    #[derive(Debug, Default)]
    struct FakeSurface {
        points: Vec<Geographic>,
        clears: usize,
        adds: usize,
        readout: Option<String>,
    }

    impl MapSurface for FakeSurface {
        fn add_overlay_point(&mut self, position: Geographic, style: &PointStyle) {
            assert_eq!(style, &PointStyle::default());
            self.points.push(position);
            self.adds += 1;
        }

        fn clear_overlay(&mut self) {
            self.points.clear();
            self.clears += 1;
        }

        fn show_readout(&mut self, text: &str) {
            self.readout = Some(text.into());
        }
    }

    #[derive(Debug, Default)]
    struct FakeList {
        renders: Vec<ListModel>,
    }

    impl ListRenderer for FakeList {
        fn render(&mut self, list: &ListModel) {
            self.renders.push(list.clone());
        }
    }

    impl FakeList {
        fn last(&self) -> &ListModel {
            self.renders.last().unwrap()
        }
    }

    /// Answers immediately, `None` meaning dismissal
    struct Answer(Option<&'static str>);

    impl DescriptionPrompt for Answer {
        fn ask(&self, _question: &str) -> impl Future<Output = Option<String>> {
            future::ready(self.0.map(String::from))
        }
    }

    /// Never answers
    struct Ignored;

    impl DescriptionPrompt for Ignored {
        fn ask(&self, _question: &str) -> impl Future<Output = Option<String>> {
            future::pending()
        }
    }

    #[derive(Default, Clone)]
    struct FakeShare {
        sent: Rc<RefCell<Vec<SharePayload>>>,
        fail: bool,
    }

    impl Share for FakeShare {
        fn share(
            &self,
            payload: &SharePayload,
        ) -> impl Future<Output = std::result::Result<(), ShareError>> {
            self.sent.borrow_mut().push(payload.clone());
            future::ready(if self.fail {
                Err(ShareError::Failed("user agent refused".into()))
            } else {
                Ok(())
            })
        }
    }

    /// Storage whose writes always fail
    struct ReadOnly;

    impl Persistence for ReadOnly {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "quota exceeded").into())
        }
    }

    type TestSync<P, D> = MarkerSync<P, FakeSurface, FakeList, D, FakeShare>;

    fn converter() -> Result<Box<dyn Converter>> {
        Ok(Box::new(Sk42Converter::new(&ProjectionParams::default())?))
    }

    fn sync_with<P: Persistence, D: DescriptionPrompt>(
        storage: P,
        prompt: D,
        share: FakeShare,
    ) -> TestSync<P, D> {
        let mut sync = MarkerSync::new(
            MarkerStore::new(storage),
            converter(),
            Frontend {
                surface: FakeSurface::default(),
                list: FakeList::default(),
                prompt,
                share,
            },
            SyncSettings::default(),
        );
        sync.init();
        sync
    }

    fn sync(answer: Option<&'static str>) -> TestSync<MemoryStorage, Answer> {
        sync_with(MemoryStorage::new(), Answer(answer), FakeShare::default())
    }

    const MOSCOW: Geographic = Geographic {
        lon: 37.62,
        lat: 55.76,
    };

    #[test]
    fn test_init_draws_stored_markers() {
        let storage = MemoryStorage::new();
        let store = MarkerStore::new(storage.clone());
        store
            .append(Marker::new(
                MarkerId::from(1),
                MOSCOW,
                Projected::new(1.0, 2.0),
                "A",
            ))
            .unwrap();

        let sync = sync_with(storage, Answer(None), FakeShare::default());

        let frontend = sync.frontend();
        assert_eq!(frontend.surface.points, vec![MOSCOW]);
        assert_eq!(frontend.list.renders.len(), 1);
        assert!(frontend.list.last().is_visible());
    }

    #[test]
    fn test_init_empty_hides_list() {
        let sync = sync(None);

        assert!(!sync.frontend().list.last().is_visible());
        assert_eq!(sync.frontend().surface.clears, 1);
    }

    #[tokio::test]
    async fn test_click_creates_marker() {
        let mut sync = sync(Some("A"));

        let marker = sync.on_click(MOSCOW).await.unwrap();

        let stored = sync.store().load_all();
        assert_eq!(stored, vec![marker.clone()]);
        assert_eq!(marker.description, "A");
        assert_eq!(marker.position(), MOSCOW);
        assert!(marker.projected_x > 0.0 && marker.projected_y > 0.0);

        let list = sync.frontend().list.last();
        assert!(list.is_visible());
        assert_eq!(list.entries().len(), 1);
        assert_eq!(list.entries().first().unwrap().id, marker.id);
        assert_eq!(sync.frontend().surface.points, vec![MOSCOW]);
        assert_eq!(sync.banner(), None);
    }

    #[tokio::test]
    async fn test_click_is_deterministic() {
        let mut a = sync(Some("A"));
        let mut b = sync(Some("A"));

        let first = a.on_click(MOSCOW).await.unwrap();
        let second = b.on_click(MOSCOW).await.unwrap();

        assert_eq!(first.projected(), second.projected());
    }

    #[tokio::test]
    async fn test_dismissed_prompt_uses_default() {
        let mut sync = sync(None);

        let marker = sync.on_click(MOSCOW).await.unwrap();

        assert_eq!(marker.description, "No description");
    }

    #[tokio::test]
    async fn test_blank_answer_uses_default() {
        let mut sync = sync(Some("   "));

        let marker = sync.on_click(MOSCOW).await.unwrap();

        assert_eq!(marker.description, "No description");
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_timeout_uses_default() {
        let mut sync = sync_with(MemoryStorage::new(), Ignored, FakeShare::default());

        let marker = sync.on_click(MOSCOW).await.unwrap();

        assert_eq!(marker.description, "No description");
        assert_eq!(sync.store().load_all().len(), 1);
    }

    #[tokio::test]
    async fn test_clicks_get_distinct_ids() {
        let mut sync = sync(Some("m"));

        for _ in 0..10 {
            sync.on_click(MOSCOW).await.unwrap();
        }

        let ids = sync
            .store()
            .load_all()
            .iter()
            .map(|m| m.id)
            .collect::<Vec<_>>();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(ids.len(), 10);
        assert_eq!(unique, ids);
    }

    #[tokio::test]
    async fn test_every_mutation_reloads_overlay() {
        let mut sync = sync(Some("m"));

        let first = sync.on_click(MOSCOW).await.unwrap();
        sync.on_click(Geographic::new(38.0, 56.0)).await.unwrap();
        sync.delete_marker(first.id).unwrap();

        let surface = &sync.frontend().surface;
        // init + two clicks + delete, each a full reload
        assert_eq!(surface.clears, 4);
        assert_eq!(surface.adds, 1 + 2 + 1);
        assert_eq!(surface.points, vec![Geographic::new(38.0, 56.0)]);
        assert_eq!(sync.frontend().list.renders.len(), 4);
    }

    #[tokio::test]
    async fn test_delete_event() {
        let mut sync = sync(Some("m"));
        let first = sync.on_click(MOSCOW).await.unwrap();
        let second = sync.on_click(MOSCOW).await.unwrap();

        sync.handle(UiEvent::Delete(first.id)).await;

        assert_eq!(sync.store().load_all(), vec![second]);
        assert_eq!(sync.frontend().list.last().entries().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_last_hides_list() {
        let mut sync = sync(Some("m"));
        let marker = sync.on_click(MOSCOW).await.unwrap();

        sync.delete_marker(marker.id).unwrap();
        sync.delete_marker(marker.id).unwrap();

        assert!(!sync.frontend().list.last().is_visible());
        assert!(sync.frontend().surface.points.is_empty());
    }

    #[tokio::test]
    async fn test_pointer_move_readout() {
        let mut sync = sync(None);

        sync.handle(UiEvent::PointerMove(MOSCOW)).await;

        let readout = sync.frontend().surface.readout.clone().unwrap();
        assert!(readout.starts_with("SK-42 X: 24"), "{readout}");
        assert!(sync.store().load_all().is_empty());
    }

    #[tokio::test]
    async fn test_pointer_move_invalid_is_skipped() {
        let mut sync = sync(None);
        sync.on_pointer_move(MOSCOW);
        let before = sync.frontend().surface.readout.clone();

        sync.on_pointer_move(Geographic::new(f64::INFINITY, 95.0));

        assert_eq!(sync.frontend().surface.readout, before);
        assert_eq!(sync.banner(), None);
    }

    #[tokio::test]
    async fn test_share_payload() {
        let share = FakeShare::default();
        let mut sync = sync_with(MemoryStorage::new(), Answer(Some("Spring")), share.clone());

        sync.on_click(MOSCOW).await.unwrap();

        let sent = share.sent.borrow();
        assert_eq!(sent.len(), 1);
        let payload = sent.first().unwrap();
        assert_eq!(payload.title, "Geosputnik marker");
        assert!(payload.text.starts_with("Marker: Spring\nSK-42 X: "));
    }

    #[tokio::test]
    async fn test_share_failure_is_not_fatal() {
        let share = FakeShare {
            fail: true,
            ..FakeShare::default()
        };
        let mut sync = sync_with(MemoryStorage::new(), Answer(Some("A")), share);

        assert!(sync.on_click(MOSCOW).await.is_ok());
        assert_eq!(sync.store().load_all().len(), 1);
        assert_eq!(sync.banner(), None);
    }

    #[tokio::test]
    async fn test_share_disabled() {
        let share = FakeShare::default();
        let mut sync = MarkerSync::new(
            MarkerStore::new(MemoryStorage::new()),
            converter(),
            Frontend {
                surface: FakeSurface::default(),
                list: FakeList::default(),
                prompt: Answer(Some("A")),
                share: share.clone(),
            },
            SyncSettings {
                share: None,
                ..SyncSettings::default()
            },
        );

        sync.on_click(MOSCOW).await.unwrap();

        assert!(share.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_shows_banner() {
        let mut sync = sync_with(ReadOnly, Answer(Some("A")), FakeShare::default());

        assert!(sync.on_click(MOSCOW).await.is_err());
        assert_eq!(sync.banner(), Some("Failed to save marker"));
        // Only the initial draw happened
        assert_eq!(sync.frontend().list.renders.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_storage_is_not_overwritten() {
        let storage = MemoryStorage::with_value(crate::store::DEFAULT_KEY, "not json");
        let mut sync = sync_with(storage.clone(), Answer(Some("A")), FakeShare::default());

        assert!(sync.on_click(MOSCOW).await.is_err());
        assert_eq!(sync.banner(), Some("Failed to save marker"));

        assert!(sync.delete_marker(MarkerId::from(1)).is_err());
        assert_eq!(sync.banner(), Some("Failed to delete marker"));

        assert_eq!(
            storage.read(crate::store::DEFAULT_KEY).unwrap().as_deref(),
            Some("not json")
        );
    }

    #[tokio::test]
    async fn test_converter_unavailable() {
        let mut sync = MarkerSync::new(
            MarkerStore::new(MemoryStorage::new()),
            Err(Error::ProjectionSetup("unknown ellipsoid".into())),
            Frontend {
                surface: FakeSurface::default(),
                list: FakeList::default(),
                prompt: Answer(Some("A")),
                share: FakeShare::default(),
            },
            SyncSettings::default(),
        );
        assert_eq!(sync.banner(), Some("Failed to configure SK-42"));

        sync.on_pointer_move(MOSCOW);
        assert_eq!(sync.frontend().surface.readout, None);

        assert!(matches!(
            sync.on_click(MOSCOW).await,
            Err(Error::ConverterUnavailable)
        ));
        assert_eq!(sync.banner(), Some("Failed to add marker"));
        assert!(sync.store().load_all().is_empty());
    }
}
