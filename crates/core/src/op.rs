//! The remote operation table.
//!
//! Every operation the client can send is listed once in [`OPS`] together with
//! its HTTP method, the status the server answers with on success, and whether
//! the request must carry a delegation token. The three token-management
//! operations are the only ones exempt; a token fetch that required a token
//! would never terminate.

use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// HTTP method an operation is sent with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported remote operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // GET
    Open,
    GetFileStatus,
    ListStatus,
    GetContentSummary,
    GetFileChecksum,
    GetHomeDirectory,
    GetDelegationToken,
    GetXAttrs,
    ListXAttrs,
    GetAclStatus,
    CheckAccess,
    // PUT
    Create,
    Mkdirs,
    CreateSymlink,
    Rename,
    SetReplication,
    SetOwner,
    SetPermission,
    SetTimes,
    RenewDelegationToken,
    CancelDelegationToken,
    ModifyAclEntries,
    RemoveAclEntries,
    RemoveDefaultAcl,
    RemoveAcl,
    SetAcl,
    SetXAttr,
    RemoveXAttr,
    CreateSnapshot,
    RenameSnapshot,
    // POST
    Append,
    Concat,
    // DELETE
    Delete,
    DeleteSnapshot,
}

/// Immutable description of one remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpDescriptor {
    pub op: Op,
    pub name: &'static str,
    pub method: HttpMethod,
    pub requires_auth: bool,
    pub expected_status: u16,
}

const fn desc(
    op: Op,
    name: &'static str,
    method: HttpMethod,
    requires_auth: bool,
    expected_status: u16,
) -> OpDescriptor {
    OpDescriptor {
        op,
        name,
        method,
        requires_auth,
        expected_status,
    }
}

use HttpMethod::{Delete as DEL, Get as GET, Post as POST, Put as PUT};

/// The operation table
pub const OPS: &[OpDescriptor] = &[
    desc(Op::Open, "OPEN", GET, true, 200),
    desc(Op::GetFileStatus, "GETFILESTATUS", GET, true, 200),
    desc(Op::ListStatus, "LISTSTATUS", GET, true, 200),
    desc(Op::GetContentSummary, "GETCONTENTSUMMARY", GET, true, 200),
    desc(Op::GetFileChecksum, "GETFILECHECKSUM", GET, true, 200),
    desc(Op::GetHomeDirectory, "GETHOMEDIRECTORY", GET, true, 200),
    desc(Op::GetDelegationToken, "GETDELEGATIONTOKEN", GET, false, 200),
    desc(Op::GetXAttrs, "GETXATTRS", GET, true, 200),
    desc(Op::ListXAttrs, "LISTXATTRS", GET, true, 200),
    desc(Op::GetAclStatus, "GETACLSTATUS", GET, true, 200),
    desc(Op::CheckAccess, "CHECKACCESS", GET, true, 200),
    desc(Op::Create, "CREATE", PUT, true, 201),
    desc(Op::Mkdirs, "MKDIRS", PUT, true, 200),
    desc(Op::CreateSymlink, "CREATESYMLINK", PUT, true, 200),
    desc(Op::Rename, "RENAME", PUT, true, 200),
    desc(Op::SetReplication, "SETREPLICATION", PUT, true, 200),
    desc(Op::SetOwner, "SETOWNER", PUT, true, 200),
    desc(Op::SetPermission, "SETPERMISSION", PUT, true, 200),
    desc(Op::SetTimes, "SETTIMES", PUT, true, 200),
    desc(Op::RenewDelegationToken, "RENEWDELEGATIONTOKEN", PUT, false, 200),
    desc(Op::CancelDelegationToken, "CANCELDELEGATIONTOKEN", PUT, false, 200),
    desc(Op::ModifyAclEntries, "MODIFYACLENTRIES", PUT, true, 200),
    desc(Op::RemoveAclEntries, "REMOVEACLENTRIES", PUT, true, 200),
    desc(Op::RemoveDefaultAcl, "REMOVEDEFAULTACL", PUT, true, 200),
    desc(Op::RemoveAcl, "REMOVEACL", PUT, true, 200),
    desc(Op::SetAcl, "SETACL", PUT, true, 200),
    desc(Op::SetXAttr, "SETXATTR", PUT, true, 200),
    desc(Op::RemoveXAttr, "REMOVEXATTR", PUT, true, 200),
    desc(Op::CreateSnapshot, "CREATESNAPSHOT", PUT, true, 200),
    desc(Op::RenameSnapshot, "RENAMESNAPSHOT", PUT, true, 200),
    desc(Op::Append, "APPEND", POST, true, 200),
    desc(Op::Concat, "CONCAT", POST, true, 200),
    desc(Op::Delete, "DELETE", DEL, true, 200),
    desc(Op::DeleteSnapshot, "DELETESNAPSHOT", DEL, true, 200),
];

impl Op {
    /// Every supported operation, in table order
    pub fn all() -> impl Iterator<Item = Op> {
        OPS.iter().map(|d| d.op)
    }

    /// Table entry for this operation
    pub fn descriptor(self) -> &'static OpDescriptor {
        // The table is indexed by discriminant.
        &OPS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn method(self) -> HttpMethod {
        self.descriptor().method
    }

    pub fn requires_auth(self) -> bool {
        self.descriptor().requires_auth
    }

    pub fn expected_status(self) -> u16 {
        self.descriptor().expected_status
    }

    /// Look up an operation by its wire name, ignoring case
    pub fn from_name(name: &str) -> Option<Op> {
        OPS.iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .map(|d| d.op)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Op {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::from_name(s).ok_or_else(|| Error::configuration(format!("unknown operation '{s}'")))
    }
}

/// Whether a request for `op_name` must carry a delegation token.
///
/// Unknown names require a token.
pub fn requires_auth(op_name: &str) -> bool {
    Op::from_name(op_name).map_or(true, Op::requires_auth)
}
