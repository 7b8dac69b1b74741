use geosputnik_lib::{
    Converter, CoreConfig, MarkerStore, MarkerSync, Result, Sk42Converter,
    storage::FileStorage,
    sync::{Frontend, SyncSettings},
};

use crate::terminal::{StdinPrompt, TerminalList, TerminalShare, TerminalSurface};

pub type Session = MarkerSync<FileStorage, TerminalSurface, TerminalList, StdinPrompt, TerminalShare>;

/// Open the marker store described by `cfg` and draw it.
pub fn open(cfg: &CoreConfig, prompt: StdinPrompt, share: bool) -> Result<Session> {
    let storage = match &cfg.markers.storage_dir {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::in_data_dir()?,
    };
    let store = MarkerStore::with_key(storage, cfg.markers.storage_key.clone());

    let converter = Sk42Converter::new(&cfg.projection).map(|c| Box::new(c) as Box<dyn Converter>);

    let mut settings = SyncSettings::from(cfg);
    if !share {
        settings.share = None;
    }

    let mut session = MarkerSync::new(
        store,
        converter,
        Frontend {
            surface: TerminalSurface::default(),
            list: TerminalList::default(),
            prompt,
            share: TerminalShare { enabled: share },
        },
        settings,
    );
    session.init();

    Ok(session)
}
