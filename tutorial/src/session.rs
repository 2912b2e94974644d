use thiserror::Error;
use tracing::{debug, info};
use tutorial_model::{NotFoundError, TutorialModel};
use tutorial_tree::{Element, Event, EventError, TreeOptions, TutorialTree};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("tutorial has no versions")]
    EmptyDocument,
}

/// The top-level view: one version of the tutorial, shown through one root tree.
#[derive(Debug)]
pub struct Session<'a> {
    model: &'a TutorialModel,
    versions: Vec<&'a str>,
    version: &'a str,
    options: TreeOptions,
    tree: TutorialTree<'a>,
}

impl<'a> Session<'a> {
    /// Open `version`, or the first version when none is named.
    pub fn open(
        model: &'a TutorialModel,
        version: Option<&str>,
        options: TreeOptions,
    ) -> Result<Self, SessionError> {
        let versions = model.versions();
        let version = match version {
            Some(wanted) => versions
                .iter()
                .copied()
                .find(|candidate| *candidate == wanted)
                .ok_or_else(|| NotFoundError {
                    version: wanted.to_owned(),
                })?,
            None => versions
                .first()
                .copied()
                .ok_or(SessionError::EmptyDocument)?,
        };
        let tree = TutorialTree::new(model.root_nodes(version)?, options);
        info!(version, "opened tutorial version");
        Ok(Self {
            model,
            versions,
            version,
            options,
            tree,
        })
    }

    pub fn versions(&self) -> &[&'a str] {
        &self.versions
    }

    pub fn version(&self) -> &'a str {
        self.version
    }

    pub fn version_index(&self) -> usize {
        self.versions
            .iter()
            .position(|version| *version == self.version)
            .unwrap_or(0)
    }

    /// Show another version with fresh interaction state.
    pub fn switch_version(&mut self, version: &str) -> Result<(), NotFoundError> {
        let Some(version) = self.versions.iter().copied().find(|v| *v == version) else {
            return Err(NotFoundError {
                version: version.to_owned(),
            });
        };
        self.tree = TutorialTree::new(self.model.root_nodes(version)?, self.options);
        self.version = version;
        debug!(version, "switched tutorial version");
        Ok(())
    }

    /// Step through versions, wrapping around at either end.
    pub fn cycle_version(&mut self, forward: bool) -> Result<(), NotFoundError> {
        let count = self.versions.len();
        if count == 0 {
            return Ok(());
        }
        let index = self.version_index();
        let next = if forward {
            (index + 1) % count
        } else {
            (index + count - 1) % count
        };
        self.switch_version(self.versions[next])
    }

    pub fn render(&self) -> Vec<Element> {
        self.tree.render()
    }

    pub fn handle(&mut self, event: &Event) -> Result<(), EventError> {
        self.tree.handle(event)
    }

    pub fn tree(&self) -> &TutorialTree<'a> {
        &self.tree
    }
}
