// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication and capability checks for the settings API.
//!
//! ## Auth Flow
//!
//! 1. The dashboard issues a signed token for a site user
//! 2. The caller sends `Authorization: Bearer <token>`
//! 3. The server:
//!    - Verifies the HS256 signature (or only decodes it in development mode)
//!    - Extracts `user_id` and `is_network` into [`TokenData`]
//!    - Hands the decoded data to the handler of the same request only
//!
//! A missing header is not an error: public endpoints simply see no token.
//! Endpoints that need a user reject the request with `Unauthorized`.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod permissions;
pub mod roles;
pub mod verifier;

pub use claims::TokenData;
pub use error::AuthError;
pub use extractor::TokenContext;
pub use permissions::{PermissionChecker, RoleDirectory};
pub use roles::{Capability, Role};
pub use verifier::{JwtVerifier, TokenVerifier};
