//! Menu forest
//!
//! Registered menu trees live in a fixed arena of nodes addressed by
//! [`MenuId`]. While a single tree is registered it is the root. As soon as a
//! second one arrives a synthetic root is created holding one submenu item
//! per registered tree plus a trailing Help item; every registered tree's
//! trailing Help is rewritten to Back at the same time. Detaching undoes it.

use core::ptr;

use heapless::{String, Vec};

use super::item::{ItemKind, ItemSpec, MenuId, MenuItem, MenuSpec, UpdateFn};
use crate::client::ClientHandle;
use crate::config::{MAX_MENU_ITEMS, MAX_MENU_NODES, MAX_REGISTERED_MENUS, MAX_TITLE_LEN};
use crate::error::{CuiError, Result};

struct MenuNode {
    title: &'static str,
    items: Vec<MenuItem, MAX_MENU_ITEMS>,
    parent: Option<MenuId>,
    /// `None` for the synthetic root
    owner: Option<ClientHandle>,
    update: Option<UpdateFn>,
    spec: Option<&'static MenuSpec>,
    /// Parent item to select when leaving this menu with Back
    return_index: usize,
}

impl MenuNode {
    fn synthetic_root() -> Self {
        Self {
            title: "",
            items: Vec::new(),
            parent: None,
            owner: None,
            update: None,
            spec: None,
            return_index: 0,
        }
    }
}

struct Registration {
    owner: ClientHandle,
    spec: &'static MenuSpec,
    top: MenuId,
}

/// Result of removing a registered tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detached {
    /// Registration slot the tree occupied
    pub slot: usize,
    /// The synthetic root was dissolved
    pub collapsed: bool,
}

/// Every registered menu tree
pub struct Forest {
    nodes: [Option<MenuNode>; MAX_MENU_NODES],
    registrations: Vec<Registration, MAX_REGISTERED_MENUS>,
    multi: Option<MenuId>,
    multi_title: String<MAX_TITLE_LEN>,
}

impl Forest {
    pub fn new(multi_title: &str) -> Self {
        let mut forest = Self {
            nodes: core::array::from_fn(|_| None),
            registrations: Vec::new(),
            multi: None,
            multi_title: String::new(),
        };
        forest.set_multi_title(multi_title);
        forest
    }

    /// Menu shown by Escape: the synthetic root or the only registered menu
    pub fn root(&self) -> Option<MenuId> {
        self.multi
            .or_else(|| self.registrations.first().map(|r| r.top))
    }

    /// Synthetic root, present with two or more registered trees
    pub fn multi(&self) -> Option<MenuId> {
        self.multi
    }

    pub fn registered(&self) -> usize {
        self.registrations.len()
    }

    fn node(&self, id: MenuId) -> Option<&MenuNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: MenuId) -> Option<&mut MenuNode> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: MenuId) -> bool {
        self.node(id).is_some()
    }

    pub fn title(&self, id: MenuId) -> &str {
        if Some(id) == self.multi {
            return self.multi_title.as_str();
        }
        self.node(id).map(|n| n.title).unwrap_or("")
    }

    /// Retitle the synthetic root; over-long titles are truncated
    pub fn set_multi_title(&mut self, title: &str) {
        self.multi_title.clear();
        for c in title.chars() {
            if self.multi_title.push(c).is_err() {
                break;
            }
        }
    }

    pub fn items(&self, id: MenuId) -> &[MenuItem] {
        self.node(id).map(|n| n.items.as_slice()).unwrap_or(&[])
    }

    pub fn item(&self, id: MenuId, index: usize) -> Option<&MenuItem> {
        self.node(id).and_then(|n| n.items.get(index))
    }

    pub fn item_mut(&mut self, id: MenuId, index: usize) -> Option<&mut MenuItem> {
        self.node_mut(id).and_then(|n| n.items.get_mut(index))
    }

    pub fn parent(&self, id: MenuId) -> Option<MenuId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn owner(&self, id: MenuId) -> Option<ClientHandle> {
        self.node(id).and_then(|n| n.owner)
    }

    pub fn return_index(&self, id: MenuId) -> usize {
        self.node(id).map(|n| n.return_index).unwrap_or(0)
    }

    pub(crate) fn set_return_index(&mut self, id: MenuId, index: usize) {
        if let Some(node) = self.node_mut(id) {
            node.return_index = index;
        }
    }

    /// Position of the submenu item in `id`'s parent that leads to `id`
    pub fn index_in_parent(&self, id: MenuId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.items(parent)
            .iter()
            .position(|item| matches!(item.kind, ItemKind::SubMenu(child) if child == id))
    }

    /// Registered top-level menu containing `id`
    pub fn top_level_of(&self, id: MenuId) -> MenuId {
        let mut id = id;
        for _ in 0..MAX_MENU_NODES {
            match self.parent(id) {
                Some(parent) if Some(parent) != self.multi => id = parent,
                _ => break,
            }
        }
        id
    }

    /// Check whether `id` is `ancestor` or below it
    pub fn is_within(&self, id: MenuId, ancestor: MenuId) -> bool {
        let mut next = Some(id);
        for _ in 0..MAX_MENU_NODES {
            match next {
                Some(current) if current == ancestor => return true,
                Some(current) => next = self.parent(current),
                None => break,
            }
        }
        false
    }

    /// Update function of `id` or its nearest ancestor that has one
    ///
    /// The synthetic root has none of its own and borrows the one of the
    /// earliest registered tree.
    pub fn update_fn_for(&self, id: MenuId) -> Option<UpdateFn> {
        let mut next = Some(id);
        for _ in 0..MAX_MENU_NODES {
            let Some(current) = next else { break };
            if let Some(update) = self.node(current).and_then(|n| n.update) {
                return Some(update);
            }
            next = self.parent(current);
        }
        self.registrations.first().and_then(|r| r.spec.update)
    }

    /// Register a client's menu tree
    pub fn attach(&mut self, owner: ClientHandle, spec: &'static MenuSpec) -> Result<MenuId> {
        if spec.update.is_none() {
            return Err(CuiError::MissingUpdateFn);
        }
        if self.registrations.is_full() {
            return Err(CuiError::MaxRegistrationsReached);
        }
        if self.registrations.iter().any(|r| ptr::eq(r.spec, spec)) {
            return Err(CuiError::InvalidParam);
        }

        let mut needed = nodes_needed(spec, 0)?;
        if self.registrations.len() == 1 {
            needed += 1;
        }
        if needed > self.free_count() {
            return Err(CuiError::NoAvailableSlots);
        }

        let top = self.build(spec, None, owner)?;

        match self.registrations.len() {
            0 => {}
            1 => {
                let first = self.registrations[0].top;
                let multi = self.alloc(MenuNode::synthetic_root())?;
                self.push_item(multi, MenuItem::new(ItemKind::SubMenu(first), None))?;
                self.push_item(multi, MenuItem::new(ItemKind::SubMenu(top), None))?;
                self.push_item(multi, MenuItem::help())?;
                self.adopt(multi, first);
                self.adopt(multi, top);
                self.multi = Some(multi);
                debug!("Synthetic root created as {:?}", multi);
            }
            _ => {
                let multi = self.multi.ok_or(CuiError::Failure)?;
                let node = self.node_mut(multi).ok_or(CuiError::Failure)?;
                let before_help = node.items.len().saturating_sub(1);
                node.items
                    .insert(before_help, MenuItem::new(ItemKind::SubMenu(top), None))
                    .map_err(|_| CuiError::NoAvailableSlots)?;
                self.adopt(multi, top);
            }
        }

        self.registrations
            .push(Registration { owner, spec, top })
            .map_err(|_| CuiError::MaxRegistrationsReached)?;

        Ok(top)
    }

    /// Remove a client's menu tree
    pub fn detach(&mut self, owner: ClientHandle, spec: &'static MenuSpec) -> Result<Detached> {
        let slot = self
            .registrations
            .iter()
            .position(|r| r.owner == owner && ptr::eq(r.spec, spec))
            .ok_or(CuiError::NotAcquired)?;

        let registration = self.registrations.remove(slot);
        self.free_tree(registration.top, 0);

        let mut collapsed = false;
        if let Some(multi) = self.multi {
            if let Some(node) = self.node_mut(multi) {
                if slot < node.items.len() {
                    node.items.remove(slot);
                }
            }

            // Root entries after the removed one moved up by one
            for i in 0..self.registrations.len() {
                let top = self.registrations[i].top;
                if let Some(node) = self.node_mut(top) {
                    if node.return_index > slot {
                        node.return_index -= 1;
                    }
                }
            }

            if self.registrations.len() == 1 {
                self.nodes[multi.index()] = None;
                self.multi = None;
                collapsed = true;

                let survivor = self.registrations[0].top;
                if let Some(node) = self.node_mut(survivor) {
                    node.parent = None;
                }
                self.set_trailing(survivor, MenuItem::help());
                debug!("Synthetic root dissolved");
            }
        }

        Ok(Detached { slot, collapsed })
    }

    /// Locate a registered menu (top-level or nested) by its definition
    ///
    /// Fails with `InvalidClientHandle` when the menu belongs to another
    /// client and with `Failure` when no registered tree contains it.
    pub fn find(&self, owner: ClientHandle, spec: &'static MenuSpec) -> Result<MenuId> {
        for registration in &self.registrations {
            if let Some(id) = self.search(registration.top, spec, 0) {
                return if self.owner(id) == Some(owner) {
                    Ok(id)
                } else {
                    Err(CuiError::InvalidClientHandle)
                };
            }
        }
        Err(CuiError::Failure)
    }

    /// Drop every tree
    pub fn clear(&mut self) {
        for node in self.nodes.iter_mut() {
            *node = None;
        }
        self.registrations.clear();
        self.multi = None;
    }

    pub fn free_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_none()).count()
    }

    fn search(&self, id: MenuId, spec: &'static MenuSpec, depth: usize) -> Option<MenuId> {
        let node = self.node(id)?;
        if node.spec.is_some_and(|s| ptr::eq(s, spec)) {
            return Some(id);
        }
        if depth >= MAX_MENU_NODES {
            return None;
        }
        node.items.iter().find_map(|item| match item.kind {
            ItemKind::SubMenu(child) => self.search(child, spec, depth + 1),
            _ => None,
        })
    }

    fn alloc(&mut self, node: MenuNode) -> Result<MenuId> {
        let index = self
            .nodes
            .iter()
            .position(Option::is_none)
            .ok_or(CuiError::NoAvailableSlots)?;
        self.nodes[index] = Some(node);
        Ok(MenuId(index as u8))
    }

    fn push_item(&mut self, id: MenuId, item: MenuItem) -> Result<()> {
        self.node_mut(id)
            .ok_or(CuiError::Failure)?
            .items
            .push(item)
            .map_err(|_| CuiError::InvalidParam)
    }

    fn set_trailing(&mut self, id: MenuId, item: MenuItem) {
        if let Some(last) = self.node_mut(id).and_then(|n| n.items.last_mut()) {
            *last = item;
        }
    }

    /// Hang a registered tree under the synthetic root
    fn adopt(&mut self, multi: MenuId, top: MenuId) {
        if let Some(node) = self.node_mut(top) {
            node.parent = Some(multi);
        }
        self.set_trailing(top, MenuItem::back());
    }

    fn build(
        &mut self,
        spec: &'static MenuSpec,
        parent: Option<MenuId>,
        owner: ClientHandle,
    ) -> Result<MenuId> {
        let id = self.alloc(MenuNode {
            title: spec.title,
            items: Vec::new(),
            parent,
            owner: Some(owner),
            update: spec.update,
            spec: Some(spec),
            return_index: 0,
        })?;

        for item in spec.items {
            let built = match *item {
                ItemSpec::Action {
                    description,
                    action,
                } => MenuItem::new(ItemKind::Action(action), Some(description)),
                ItemSpec::Intercept {
                    description,
                    handler,
                } => MenuItem::new(ItemKind::Intercept(handler), Some(description)),
                ItemSpec::SubMenu(child) => {
                    let child = self.build(child, Some(id), owner)?;
                    MenuItem::new(ItemKind::SubMenu(child), None)
                }
            };
            self.push_item(id, built)?;
        }

        let trailing = if parent.is_none() {
            MenuItem::help()
        } else {
            MenuItem::back()
        };
        self.push_item(id, trailing)?;

        Ok(id)
    }

    fn free_tree(&mut self, id: MenuId, depth: usize) {
        let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::take) else {
            return;
        };
        if depth >= MAX_MENU_NODES {
            return;
        }
        for item in node.items.iter() {
            if let ItemKind::SubMenu(child) = item.kind {
                self.free_tree(child, depth + 1);
            }
        }
    }
}

/// Arena nodes a definition will occupy, validating its shape on the way
fn nodes_needed(spec: &MenuSpec, depth: usize) -> Result<usize> {
    // Room for the trailing Help/Back item
    if depth >= MAX_MENU_NODES || spec.items.len() >= MAX_MENU_ITEMS {
        return Err(CuiError::InvalidParam);
    }

    let mut total = 1;
    for item in spec.items {
        if let ItemSpec::SubMenu(child) = item {
            total += nodes_needed(child, depth + 1)?;
            if total > MAX_MENU_NODES {
                return Err(CuiError::NoAvailableSlots);
            }
        }
    }
    Ok(total)
}
