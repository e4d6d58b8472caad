//! Fakes en memoria de la persistencia.
//!
//! Implementan los mismos traits que los repositorios PostgreSQL sobre un
//! par de tablas en memoria compartidas. `MemoryRoleStore` reproduce el
//! contrato todo-o-nada de la región transaccional (snapshot y restore) y
//! puede inyectar un fallo a mitad de la reasignación.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use users_roles_api::models::role::Role;
use users_roles_api::models::user::User;
use users_roles_api::repositories::{RoleStore, UserStore};
use users_roles_api::utils::errors::{AppError, AppResult};

/// Tablas en memoria compartidas por ambos stores
#[derive(Default)]
pub struct MemoryDb {
    pub roles: Vec<Role>,
    pub users: Vec<User>,
}

pub fn new_db() -> Arc<Mutex<MemoryDb>> {
    Arc::new(Mutex::new(MemoryDb::default()))
}

pub struct MemoryRoleStore {
    db: Arc<Mutex<MemoryDb>>,
    // Simula un fallo de persistencia después de reasignar N usuarios
    fail_reassign_after: Option<usize>,
}

impl MemoryRoleStore {
    pub fn new(db: Arc<Mutex<MemoryDb>>) -> Self {
        Self {
            db,
            fail_reassign_after: None,
        }
    }

    pub fn failing_after(db: Arc<Mutex<MemoryDb>>, reassigned: usize) -> Self {
        Self {
            db,
            fail_reassign_after: Some(reassigned),
        }
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn insert(&self, name: &str, description: Option<&str>) -> AppResult<Role> {
        let mut db = self.db.lock().unwrap();

        if db.roles.iter().any(|r| r.name == name) {
            return Err(AppError::DuplicateName(format!(
                "El rol '{}' ya existe",
                name
            )));
        }

        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        db.roles.push(role.clone());

        Ok(role)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        let db = self.db.lock().unwrap();
        Ok(db.roles.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let db = self.db.lock().unwrap();
        Ok(db.roles.iter().find(|r| r.name == name).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Role>> {
        let mut roles = self.db.lock().unwrap().roles.clone();
        roles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(roles)
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Role>> {
        let query = query.to_lowercase();
        let mut roles: Vec<Role> = self
            .db
            .lock()
            .unwrap()
            .roles
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&query)
                    || r.description
                        .as_deref()
                        .map(|d| d.to_lowercase().contains(&query))
                        .unwrap_or(false)
            })
            .cloned()
            .collect();
        roles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(roles)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<Option<Role>> {
        let mut db = self.db.lock().unwrap();

        let Some(role) = db.roles.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        if let Some(name) = name {
            role.name = name.to_string();
        }
        if let Some(description) = description {
            role.description = Some(description.to_string());
        }
        role.updated_at = Utc::now();

        Ok(Some(role.clone()))
    }

    async fn delete_reassigning_to(&self, role_id: Uuid, fallback_name: &str) -> AppResult<u64> {
        let mut db = self.db.lock().unwrap();

        // Snapshot para simular el rollback de la transacción
        let snapshot = db.users.clone();

        let affected: Vec<Uuid> = db
            .users
            .iter()
            .filter(|u| u.role_id == role_id)
            .map(|u| u.id)
            .collect();

        let mut reassigned = 0u64;
        if !affected.is_empty() {
            let Some(fallback_id) = db
                .roles
                .iter()
                .find(|r| r.name == fallback_name)
                .map(|r| r.id)
            else {
                return Err(AppError::FallbackRoleMissing(format!(
                    "El rol por defecto '{}' no existe",
                    fallback_name
                )));
            };

            for user_id in &affected {
                if self
                    .fail_reassign_after
                    .is_some_and(|limit| reassigned as usize >= limit)
                {
                    db.users = snapshot.clone();
                    return Err(AppError::Internal(
                        "fallo de persistencia simulado".to_string(),
                    ));
                }

                let user = db.users.iter_mut().find(|u| u.id == *user_id).unwrap();
                user.role_id = fallback_id;
                user.updated_at = Utc::now();
                reassigned += 1;
            }
        }

        let before = db.roles.len();
        db.roles.retain(|r| r.id != role_id);
        if db.roles.len() == before {
            db.users = snapshot;
            return Err(AppError::NotFound(format!(
                "Rol con id '{}' no encontrado",
                role_id
            )));
        }

        Ok(reassigned)
    }
}

pub struct MemoryUserStore {
    db: Arc<Mutex<MemoryDb>>,
}

impl MemoryUserStore {
    pub fn new(db: Arc<Mutex<MemoryDb>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
        role_id: Uuid,
    ) -> AppResult<User> {
        let mut db = self.db.lock().unwrap();

        if db.users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail(format!(
                "El email '{}' ya está en uso",
                email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.map(str::to_string),
            role_id,
            created_at: now,
            updated_at: now,
        };
        db.users.push(user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let db = self.db.lock().unwrap();
        Ok(db.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let db = self.db.lock().unwrap();
        Ok(db.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.db.lock().unwrap().users.clone())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
        role_id: Option<Uuid>,
    ) -> AppResult<Option<User>> {
        let mut db = self.db.lock().unwrap();

        let Some(user) = db.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(name) = name {
            user.name = name.to_string();
        }
        if let Some(email) = email {
            user.email = email.to_string();
        }
        if let Some(password_hash) = password_hash {
            user.password_hash = Some(password_hash.to_string());
        }
        if let Some(role_id) = role_id {
            user.role_id = role_id;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let mut db = self.db.lock().unwrap();
        let before = db.users.len();
        db.users.retain(|u| u.id != id);
        Ok(db.users.len() < before)
    }
}
