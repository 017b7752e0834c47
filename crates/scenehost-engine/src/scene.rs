//! Arena scene graph
//!
//! Entities live in a flat arena indexed by [`EntityId`]. Parent/child
//! relationships are stored as id lists on each entity, so the graph never
//! holds owning pointers between nodes.

use glam::{EulerRot, Quat, Vec3};
use std::fmt;

use crate::component::{Component, ComponentKind};
use crate::error::EngineError;

/// Index of an entity inside its scene's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position and orientation of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Orientation as XYZ euler angles in degrees
    pub fn euler_angles(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }
}

/// Quaternion for XYZ euler angles given in degrees
pub fn euler_quat(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(EulerRot::XYZ, x.to_radians(), y.to_radians(), z.to_radians())
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub transform: Transform,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
    pub components: Vec<Component>,
}

impl Entity {
    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.iter().find(|c| c.kind() == kind)
    }

    pub fn has(&self, kind: ComponentKind) -> bool {
        self.component(kind).is_some()
    }
}

/// Scene graph owned by one runtime context
#[derive(Debug)]
pub struct Scene {
    entities: Vec<Entity>,
    root: EntityId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene holding only the root entity
    pub fn new() -> Self {
        let root = EntityId(0);
        Self {
            entities: vec![Entity {
                id: root,
                name: "Root".to_string(),
                transform: Transform::default(),
                parent: None,
                children: Vec::new(),
                components: Vec::new(),
            }],
            root,
        }
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Number of entities, counting the root
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// True until something other than the root is created
    pub fn has_only_root(&self) -> bool {
        self.entities.len() == 1
    }

    /// Create a detached entity. It is not part of the rendered graph until
    /// it is added under the root.
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity {
            id,
            name: name.into(),
            transform: Transform::default(),
            parent: None,
            children: Vec::new(),
            components: Vec::new(),
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity, EngineError> {
        self.entities
            .get_mut(id.0 as usize)
            .ok_or(EngineError::UnknownEntity(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        (id.0 as usize) < self.entities.len()
    }

    /// All entities in creation order, root first
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Ids of entities carrying a component of the given kind
    pub fn entities_with(&self, kind: ComponentKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.has(kind))
            .map(|e| e.id)
            .collect()
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or_default()
    }

    /// True if walking up from `id` reaches the root
    pub fn is_attached(&self, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.get(node).and_then(|e| e.parent);
        }
        false
    }

    fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = self.get(id).and_then(|e| e.parent);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.get(node).and_then(|e| e.parent);
        }
        false
    }

    /// Attach `child` under `parent`, detaching it from any previous parent
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), EngineError> {
        if !self.contains(parent) {
            return Err(EngineError::UnknownEntity(parent));
        }
        if !self.contains(child) {
            return Err(EngineError::UnknownEntity(child));
        }
        if child == self.root || child == parent || self.is_ancestor(child, parent) {
            return Err(EngineError::InvalidParent { parent, child });
        }

        if let Some(previous) = self.get(child).and_then(|e| e.parent) {
            self.get_mut(previous)?.children.retain(|c| *c != child);
        }
        self.get_mut(parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Attach a component, rejecting a second component of the same kind
    pub fn add_component(&mut self, id: EntityId, component: Component) -> Result<(), EngineError> {
        let entity = self.get_mut(id)?;
        let kind = component.kind();
        if entity.has(kind) {
            return Err(EngineError::DuplicateComponent { entity: id, kind });
        }
        entity.components.push(component);
        Ok(())
    }

    pub fn component(&self, id: EntityId, kind: ComponentKind) -> Option<&Component> {
        self.get(id).and_then(|e| e.component(kind))
    }

    pub(crate) fn component_mut(&mut self, id: EntityId, kind: ComponentKind) -> Option<&mut Component> {
        self.entities
            .get_mut(id.0 as usize)
            .and_then(|e| e.components.iter_mut().find(|c| c.kind() == kind))
    }

    pub fn transform(&self, id: EntityId) -> Option<Transform> {
        self.get(id).map(|e| e.transform)
    }

    pub fn set_transform(&mut self, id: EntityId, transform: Transform) -> Result<(), EngineError> {
        self.get_mut(id)?.transform = transform;
        Ok(())
    }

    pub fn set_position(&mut self, id: EntityId, x: f32, y: f32, z: f32) -> Result<(), EngineError> {
        self.get_mut(id)?.transform.position = Vec3::new(x, y, z);
        Ok(())
    }

    /// Set orientation from XYZ euler angles in degrees
    pub fn set_euler_angles(&mut self, id: EntityId, x: f32, y: f32, z: f32) -> Result<(), EngineError> {
        self.get_mut(id)?.transform.rotation = euler_quat(x, y, z);
        Ok(())
    }

    /// Rotate by XYZ euler angles in degrees, applied on top of the current orientation
    pub fn rotate_by(&mut self, id: EntityId, dx: f32, dy: f32, dz: f32) -> Result<(), EngineError> {
        let transform = &mut self.get_mut(id)?.transform;
        transform.rotation = (euler_quat(dx, dy, dz) * transform.rotation).normalize();
        Ok(())
    }
}
