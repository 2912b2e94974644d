use tracing::{debug, warn};
use tutorial_model::{Node, NodeKind};
use tutorial_view::{Fragment, Render, ViewNode};

use crate::{
    DefaultSelection, Element, ElementKind, Event, EventError, NodePath, TreeOptions,
};

const RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

/// Renders one node sequence and owns the interaction state of that subtree.
///
/// Each selected branch gets its own child `TutorialTree`, so state never
/// leaks between sibling paths or up into the parent.
#[derive(Debug, Clone)]
pub struct TutorialTree<'a> {
    nodes: &'a [Node],
    options: TreeOptions,
    slots: Vec<Slot<'a>>,
}

#[derive(Debug, Clone)]
struct Slot<'a> {
    notes_visible: bool,
    state: SlotState<'a>,
}

#[derive(Debug, Clone)]
enum SlotState<'a> {
    Content,
    BranchSet {
        selected: Option<&'a str>,
    },
    Branch {
        /// Index of the nearest preceding branch set in this sequence.
        owner: Option<usize>,
        child: Option<Box<TutorialTree<'a>>>,
    },
}

impl<'a> Slot<'a> {
    fn new(state: SlotState<'a>) -> Self {
        Self {
            notes_visible: false,
            state,
        }
    }
}

impl<'a> TutorialTree<'a> {
    pub fn new(nodes: &'a [Node], options: TreeOptions) -> Self {
        let mut owner = None;
        let slots = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let state = match &node.kind {
                    NodeKind::BranchSet { .. } => {
                        owner = Some(index);
                        SlotState::BranchSet { selected: None }
                    }
                    NodeKind::Branch { name, .. } => {
                        if owner.is_none() {
                            debug!(index, branch = %name, "branch has no enclosing branch set");
                        }
                        SlotState::Branch { owner, child: None }
                    }
                    NodeKind::Malformed { tag, reason } => {
                        warn!(index, ?tag, %reason, "malformed tutorial node");
                        SlotState::Content
                    }
                    _ => SlotState::Content,
                };
                Slot::new(state)
            })
            .collect();

        let mut tree = Self {
            nodes,
            options,
            slots,
        };

        if options.default_selection == DefaultSelection::First {
            for (index, node) in nodes.iter().enumerate() {
                if let NodeKind::BranchSet { branches } = &node.kind {
                    if let Some(first) = branches.first() {
                        tree.apply_selection(index, first.name.as_str());
                    }
                }
            }
        }

        tree
    }

    /// Render this sequence. Pure: the same state always renders the same elements.
    pub fn render(&self) -> Vec<Element> {
        self.render_at(&NodePath::root())
    }

    fn render_at(&self, base: &NodePath) -> Vec<Element> {
        self.nodes
            .iter()
            .zip(&self.slots)
            .enumerate()
            .filter_map(|(index, (node, slot))| self.render_node(base.child(index), node, slot))
            .collect()
    }

    fn render_node(&self, path: NodePath, node: &'a Node, slot: &Slot<'a>) -> Option<Element> {
        let mut children = Vec::new();
        if node.has_notes() && slot.notes_visible {
            let notes = node
                .notes
                .iter()
                .map(|note| {
                    Element::new(
                        path.clone(),
                        ElementKind::Note {
                            text: note.text.clone(),
                        },
                    )
                })
                .collect();
            children.push(Element::new(path.clone(), ElementKind::Notes).children(notes));
        }

        let kind = match (&node.kind, &slot.state) {
            (NodeKind::Title { text }, _) => ElementKind::Title { text: text.clone() },
            (NodeKind::Paragraph { text }, _) => ElementKind::Paragraph { text: text.clone() },
            (NodeKind::Image { url }, _) => ElementKind::Image { url: url.clone() },
            (NodeKind::Malformed { reason, .. }, _) => ElementKind::Placeholder {
                reason: reason.clone(),
            },
            (NodeKind::BranchSet { branches }, SlotState::BranchSet { selected }) => {
                children.extend(branches.iter().map(|option| {
                    let name = option.name.clone();
                    Element::new(
                        path.clone(),
                        ElementKind::BranchOption {
                            active: *selected == Some(option.name.as_str()),
                            name: name.clone(),
                        },
                    )
                    .on_click(Event::SelectBranch {
                        path: path.clone(),
                        name,
                    })
                }));
                ElementKind::BranchSet
            }
            (NodeKind::Branch { name, .. }, SlotState::Branch { child, .. }) => {
                // Unselected branches are absent from the output, not hidden.
                let child = child.as_ref()?;
                children.extend(stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || {
                    child.render_at(&path)
                }));
                ElementKind::Branch { name: name.clone() }
            }
            (kind, state) => {
                warn!(%path, ?kind, ?state, "node and slot state disagree");
                return None;
            }
        };

        let mut element = Element::new(path.clone(), kind).children(children);
        if node.has_notes() {
            element = element.on_click(Event::ToggleNotes(path));
        }
        Some(element)
    }

    /// Dispatch an event from the rendering host.
    pub fn handle(&mut self, event: &Event) -> Result<(), EventError> {
        match event {
            Event::ToggleNotes(path) => self.toggle_notes(path).map(|_| ()),
            Event::SelectBranch { path, name } => self.select_branch(path, name),
        }
    }

    /// Flip the notes visibility of one node. Returns the new visibility.
    pub fn toggle_notes(&mut self, path: &NodePath) -> Result<bool, EventError> {
        let (tree, index) = self.locate_mut(path.indices()).ok_or_else(|| EventError::NotFound {
            path: path.clone(),
        })?;
        if !tree.nodes[index].has_notes() {
            return Err(EventError::NoNotes { path: path.clone() });
        }
        let slot = &mut tree.slots[index];
        slot.notes_visible = !slot.notes_visible;
        debug!(%path, visible = slot.notes_visible, "toggled notes");
        Ok(slot.notes_visible)
    }

    /// Select one option of the branch set at `path`, replacing any previous selection.
    pub fn select_branch(&mut self, path: &NodePath, name: &str) -> Result<(), EventError> {
        let (tree, index) = self.locate_mut(path.indices()).ok_or_else(|| EventError::NotFound {
            path: path.clone(),
        })?;
        let nodes = tree.nodes;
        let NodeKind::BranchSet { branches } = &nodes[index].kind else {
            return Err(EventError::NotABranchSet { path: path.clone() });
        };
        let option = branches
            .iter()
            .find(|option| option.name == name)
            .ok_or_else(|| EventError::UnknownOption {
                path: path.clone(),
                name: name.to_owned(),
            })?;
        debug!(%path, branch = %option.name, "selected branch");
        tree.apply_selection(index, option.name.as_str());
        Ok(())
    }

    pub fn selected_branch(&self, path: &NodePath) -> Result<Option<&'a str>, EventError> {
        let (tree, index) = self.locate(path.indices()).ok_or_else(|| EventError::NotFound {
            path: path.clone(),
        })?;
        match tree.slots[index].state {
            SlotState::BranchSet { selected } => Ok(selected),
            _ => Err(EventError::NotABranchSet { path: path.clone() }),
        }
    }

    pub fn notes_visible(&self, path: &NodePath) -> Result<bool, EventError> {
        let (tree, index) = self.locate(path.indices()).ok_or_else(|| EventError::NotFound {
            path: path.clone(),
        })?;
        Ok(tree.slots[index].notes_visible)
    }

    fn apply_selection(&mut self, set_index: usize, selected: &'a str) {
        if let SlotState::BranchSet { selected: current } = &mut self.slots[set_index].state {
            *current = Some(selected);
        }

        let nodes = self.nodes;
        let options = self.options;
        for (node, slot) in nodes.iter().zip(self.slots.iter_mut()) {
            let (NodeKind::Branch { name, content }, SlotState::Branch { owner, child }) =
                (&node.kind, &mut slot.state)
            else {
                continue;
            };
            if *owner != Some(set_index) {
                continue;
            }
            if name == selected {
                if child.is_none() {
                    let tree = stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || {
                        TutorialTree::new(content, options)
                    });
                    *child = Some(Box::new(tree));
                }
            } else if child.take().is_some() {
                slot.notes_visible = false;
            }
        }
    }

    /// Whether the node at `index` is part of the rendered output.
    fn is_rendered(&self, index: usize) -> bool {
        match self.slots.get(index) {
            Some(Slot {
                state: SlotState::Branch { child, .. },
                ..
            }) => child.is_some(),
            Some(_) => true,
            None => false,
        }
    }

    fn locate(&self, indices: &[usize]) -> Option<(&Self, usize)> {
        match indices {
            [] => None,
            [index] => self.is_rendered(*index).then_some((self, *index)),
            [index, rest @ ..] => match &self.slots.get(*index)?.state {
                SlotState::Branch {
                    child: Some(child), ..
                } => child.locate(rest),
                _ => None,
            },
        }
    }

    fn locate_mut(&mut self, indices: &[usize]) -> Option<(&mut Self, usize)> {
        match indices {
            [] => None,
            [index] => {
                if self.is_rendered(*index) {
                    Some((self, *index))
                } else {
                    None
                }
            }
            [index, rest @ ..] => match &mut self.slots.get_mut(*index)?.state {
                SlotState::Branch {
                    child: Some(child), ..
                } => child.locate_mut(rest),
                _ => None,
            },
        }
    }
}

impl Render for TutorialTree<'_> {
    fn render(&self) -> ViewNode {
        Fragment::new(
            TutorialTree::render(self)
                .iter()
                .map(|element| element.tree().into())
                .collect(),
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorial_model::TutorialDocument;

    fn doc(json: &str) -> TutorialDocument {
        TutorialDocument::from_json_str(json).unwrap()
    }

    const BRANCHING: &str = r#"{ "v1": [
        { "type": "title", "text": "Intro" },
        { "type": "branches", "branches": [{ "name": "A" }, { "name": "B" }] },
        { "type": "branch", "name": "A", "content": [{ "type": "paragraph", "text": "Path A" }] },
        { "type": "branch", "name": "B", "content": [{ "type": "paragraph", "text": "Path B" }] }
    ] }"#;

    #[test]
    fn first_policy_selects_first_option() {
        let doc = doc(BRANCHING);
        let nodes = doc.root_nodes("v1").unwrap();
        let tree = TutorialTree::new(
            nodes,
            TreeOptions::default().default_selection(DefaultSelection::First),
        );
        assert_eq!(tree.selected_branch(&NodePath::from([1])), Ok(Some("A")));
        let elements = tree.render();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[2].kind, ElementKind::Branch { name: "A".to_owned() });
    }

    #[test]
    fn none_policy_selects_nothing() {
        let doc = doc(BRANCHING);
        let tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        assert_eq!(tree.selected_branch(&NodePath::from([1])), Ok(None));
        assert_eq!(tree.render().len(), 2);
    }

    #[test]
    fn events_on_unrendered_branch_are_not_found() {
        let doc = doc(BRANCHING);
        let mut tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        let path = NodePath::from([2, 0]);
        assert_eq!(
            tree.toggle_notes(&path),
            Err(EventError::NotFound { path: path.clone() })
        );
    }

    #[test]
    fn unselected_branch_node_is_not_found() {
        let doc = doc(
            r#"{ "v1": [
                { "type": "branches", "branches": ["A", "B"] },
                { "type": "branch", "name": "A", "notes": [{ "text": "n" }], "content": [] },
                { "type": "branch", "name": "B", "notes": [{ "text": "n" }], "content": [] }
            ] }"#,
        );
        let mut tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        let a = NodePath::from([1]);
        let b = NodePath::from([2]);
        assert_eq!(
            tree.toggle_notes(&a),
            Err(EventError::NotFound { path: a.clone() })
        );
        assert_eq!(
            tree.notes_visible(&a),
            Err(EventError::NotFound { path: a.clone() })
        );

        tree.select_branch(&NodePath::from([0]), "A").unwrap();
        assert_eq!(tree.toggle_notes(&a), Ok(true));
        assert_eq!(tree.notes_visible(&a), Ok(true));
        assert_eq!(
            tree.toggle_notes(&b),
            Err(EventError::NotFound { path: b })
        );
    }

    #[test]
    fn selecting_on_non_branch_set_fails() {
        let doc = doc(BRANCHING);
        let mut tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        let path = NodePath::from([0]);
        assert_eq!(
            tree.select_branch(&path, "A"),
            Err(EventError::NotABranchSet { path })
        );
    }

    #[test]
    fn selecting_unknown_option_fails() {
        let doc = doc(BRANCHING);
        let mut tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        let path = NodePath::from([1]);
        assert_eq!(
            tree.select_branch(&path, "Z"),
            Err(EventError::UnknownOption {
                path: path.clone(),
                name: "Z".to_owned()
            })
        );
        assert_eq!(tree.selected_branch(&path), Ok(None));
    }

    #[test]
    fn toggling_node_without_notes_fails() {
        let doc = doc(BRANCHING);
        let mut tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        let path = NodePath::from([0]);
        assert_eq!(tree.toggle_notes(&path), Err(EventError::NoNotes { path }));
    }

    #[test]
    fn option_without_branch_node_renders_nothing_below() {
        let doc = doc(
            r#"{ "v1": [
                { "type": "branches", "branches": ["A", "Ghost"] },
                { "type": "branch", "name": "A", "content": [] }
            ] }"#,
        );
        let mut tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        tree.select_branch(&NodePath::from([0]), "Ghost").unwrap();
        let elements = tree.render();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind, ElementKind::BranchSet);
    }

    #[test]
    fn branch_belongs_to_nearest_preceding_set() {
        let doc = doc(
            r#"{ "v1": [
                { "type": "branches", "branches": ["A", "B"] },
                { "type": "branch", "name": "A", "content": [{ "type": "paragraph", "text": "first A" }] },
                { "type": "branches", "branches": ["A", "B"] },
                { "type": "branch", "name": "A", "content": [{ "type": "paragraph", "text": "second A" }] }
            ] }"#,
        );
        let mut tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        tree.select_branch(&NodePath::from([2]), "A").unwrap();

        let elements = tree.render();
        let branches: Vec<&NodePath> = elements
            .iter()
            .filter(|e| matches!(e.kind, ElementKind::Branch { .. }))
            .map(|e| &e.path)
            .collect();
        assert_eq!(branches, [&NodePath::from([3])]);
    }

    #[test]
    fn branch_without_set_never_renders() {
        let doc = doc(
            r#"{ "v1": [
                { "type": "branch", "name": "A", "content": [{ "type": "paragraph", "text": "orphan" }] },
                { "type": "title", "text": "T" }
            ] }"#,
        );
        let tree = TutorialTree::new(
            doc.root_nodes("v1").unwrap(),
            TreeOptions::default().default_selection(DefaultSelection::First),
        );
        let elements = tree.render();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].path, NodePath::from([1]));
    }

    #[test]
    fn deselected_branch_forgets_its_state() {
        let doc = doc(
            r#"{ "v1": [
                { "type": "branches", "branches": ["A", "B"] },
                { "type": "branch", "name": "A", "content": [
                    { "type": "paragraph", "text": "p", "notes": [{ "text": "n" }] }
                ] },
                { "type": "branch", "name": "B", "content": [] }
            ] }"#,
        );
        let mut tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        let set = NodePath::from([0]);
        let inner = NodePath::from([1, 0]);

        tree.select_branch(&set, "A").unwrap();
        assert_eq!(tree.toggle_notes(&inner), Ok(true));
        tree.select_branch(&set, "B").unwrap();
        tree.select_branch(&set, "A").unwrap();
        assert_eq!(tree.notes_visible(&inner), Ok(false));
    }

    #[test]
    fn reselecting_same_branch_keeps_its_state() {
        let doc = doc(
            r#"{ "v1": [
                { "type": "branches", "branches": ["A"] },
                { "type": "branch", "name": "A", "content": [
                    { "type": "paragraph", "text": "p", "notes": [{ "text": "n" }] }
                ] }
            ] }"#,
        );
        let mut tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        let set = NodePath::from([0]);
        let inner = NodePath::from([1, 0]);

        tree.select_branch(&set, "A").unwrap();
        tree.toggle_notes(&inner).unwrap();
        tree.select_branch(&set, "A").unwrap();
        assert_eq!(tree.notes_visible(&inner), Ok(true));
    }

    #[test]
    fn malformed_node_renders_placeholder_between_siblings() {
        let doc = doc(
            r#"{ "v1": [
                { "type": "title", "text": "before" },
                { "type": "carousel" },
                { "type": "paragraph", "text": "after" }
            ] }"#,
        );
        let tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        let elements = tree.render();
        assert_eq!(elements.len(), 3);
        assert!(matches!(elements[1].kind, ElementKind::Placeholder { .. }));
        assert_eq!(
            elements[2].kind,
            ElementKind::Paragraph {
                text: "after".to_owned()
            }
        );
    }

    #[test]
    fn render_trait_outputs_text_tree() {
        let doc = doc(BRANCHING);
        let mut tree = TutorialTree::new(doc.root_nodes("v1").unwrap(), TreeOptions::default());
        tree.select_branch(&NodePath::from([1]), "B").unwrap();
        let text = Render::render(&tree).to_string();
        assert!(text.contains("Intro"));
        assert!(text.contains("(•) B"));
        assert!(text.contains("( ) A"));
        assert!(text.contains("Path B"));
        assert!(!text.contains("Path A"));
    }
}
