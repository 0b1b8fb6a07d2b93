// src/cli/catalog.rs

//! The built-in resource groups. Within a group the first matching pattern
//! wins, so more specific patterns are listed before looser ones.

use crate::{
    core::registry::{Action, Endpoint, Handler, OperationSpec, Registry, RegistryError, ResourceGroup},
    models::Method::{self, Delete, Get, Post, Put},
};

const CREATE_HELP: Option<&str> = Some("create (c) [$payload|--build|--from-csv|--from-json]");

const fn op(name: &'static str, pattern: &'static str, method: Method, path: &'static str) -> OperationSpec {
    OperationSpec {
        name,
        pattern,
        help_pattern: None,
        action: Action::Request(Endpoint { method, path }),
    }
}

const fn create(name: &'static str, path: &'static str) -> OperationSpec {
    OperationSpec {
        name,
        pattern: "create $payload",
        help_pattern: CREATE_HELP,
        action: Action::Request(Endpoint {
            method: Method::Post,
            path,
        }),
    }
}

const fn handler(name: &'static str, pattern: &'static str, handler: Handler) -> OperationSpec {
    OperationSpec {
        name,
        pattern,
        help_pattern: None,
        action: Action::Handler(handler),
    }
}

pub static RESOURCE_GROUPS: &[ResourceGroup] = &[
    ResourceGroup {
        first_args: &["keys"],
        about: "View and choose a stored API key for global use.",
        operations: &[
            handler("addKey", "add $name $region $apiKey", Handler::KeysAdd),
            handler("listKeys", "list", Handler::KeysList),
            handler("readKey", "$name read", Handler::KeysRead),
            handler("useKey", "$name use", Handler::KeysUse),
            handler("removeKey", "$name remove", Handler::KeysRemove),
        ],
    },
    ResourceGroup {
        first_args: &["options"],
        about: "Choose CLI options.",
        operations: &[
            handler("listOptions", "list", Handler::OptionsList),
            handler("setOption", "$option $state", Handler::OptionsSet),
        ],
    },
    ResourceGroup {
        first_args: &["accounts"],
        about: "Work with accounts and account accesses.",
        operations: &[
            op("listAccounts", "list", Get, "/accounts"),
            op("readAccount", "$id read", Get, "/accounts/{0}"),
            op("updateAccount", "$id update $payload", Put, "/accounts/{0}"),
            op("listAccesses", "$id accesses list", Get, "/accounts/{0}/accesses"),
            op("readAccess", "$id accesses $id read", Get, "/accounts/{0}/accesses/{2}"),
            op("updateAccess", "$id accesses $id update $payload", Put, "/accounts/{0}/accesses/{2}"),
            op("listDomains", "$id domains list", Get, "/accounts/{0}/domains"),
            op("listShortDomains", "$id short-domains list", Get, "/accounts/{0}/shortDomains"),
            op("createOperatorAccess", "$id operator-accesses create $payload", Post, "/accounts/{0}/operatorAccess"),
            op("listOperatorAccesses", "$id operator-accesses list", Get, "/accounts/{0}/operatorAccess"),
            op("readOperatorAccess", "$id operator-accesses $id read", Get, "/accounts/{0}/operatorAccess/{2}"),
            op("updateOperatorAccess", "$id operator-accesses $id update $payload", Put, "/accounts/{0}/operatorAccess/{2}"),
            op("deleteOperatorAccess", "$id operator-accesses $id delete", Delete, "/accounts/{0}/operatorAccess/{2}"),
        ],
    },
    ResourceGroup {
        first_args: &["account-config"],
        about: "Update account configuration.",
        operations: &[
            handler("help", "help", Handler::AccountConfigHelp),
            handler("listAccountConfigs", "list", Handler::AccountConfigList),
            handler("readAccountConfig", "$name read", Handler::AccountConfigRead),
            handler("updateAccountConfig", "$name update $payload", Handler::AccountConfigUpdate),
            handler("deleteAccountConfig", "$name delete", Handler::AccountConfigDelete),
        ],
    },
    ResourceGroup {
        first_args: &["access-policies", "ap"],
        about: "Work with access policies (enterprise only).",
        operations: &[
            create("createAccessPolicy", "/accessPolicies"),
            op("listAccessPolicies", "list", Get, "/accessPolicies"),
            op("readAccessPolicy", "$id read", Get, "/accessPolicies/{0}"),
            op("updateAccessPolicy", "$id update $payload", Put, "/accessPolicies/{0}"),
            op("deleteAccessPolicy", "$id delete", Delete, "/accessPolicies/{0}"),
        ],
    },
    ResourceGroup {
        first_args: &["access-tokens", "at"],
        about: "Work with access tokens (enterprise only).",
        operations: &[
            create("createAccessToken", "/accessTokens"),
            op("listAccessTokens", "list", Get, "/accessTokens"),
        ],
    },
    ResourceGroup {
        first_args: &["actions"],
        about: "Work with actions of a given type.",
        operations: &[
            op("createAction", "$type create $payload", Post, "/actions/{0}"),
            op("listActions", "$type list", Get, "/actions/{0}"),
            op("readAction", "$type $id read", Get, "/actions/{0}/{1}"),
            op("deleteAction", "$type $id delete", Delete, "/actions/{0}/{1}"),
        ],
    },
    ResourceGroup {
        first_args: &["collections", "c"],
        about: "Work with collection resources.",
        operations: &[
            create("createCollection", "/collections"),
            op("readCollection", "$id read", Get, "/collections/{0}"),
            op("listCollections", "list", Get, "/collections"),
            op("updateCollection", "$id update $payload", Put, "/collections/{0}"),
            op("deleteCollection", "$id delete", Delete, "/collections/{0}"),
            op("createCollectionAction", "$id actions create $payload", Post, "/collections/{0}/actions/all"),
            op("listCollectionActions", "$id actions list", Get, "/collections/{0}/actions/all"),
            op("readCollectionAction", "$id actions $id read", Get, "/collections/{0}/actions/all/{2}"),
            op("addCollections", "$id collections add $payload", Post, "/collections/{0}/collections"),
            op("listCollectionCollections", "$id collections list", Get, "/collections/{0}/collections"),
            op("removeCollection", "$id collections $id delete", Delete, "/collections/{0}/collections/{2}"),
            op("removeAllCollections", "$id collections delete", Delete, "/collections/{0}/collections"),
            op("addThngs", "$id thngs add $payload", Put, "/collections/{0}/thngs"),
            op("listCollectionThngs", "$id thngs list", Get, "/collections/{0}/thngs"),
            op("removeThng", "$id thngs $id delete", Delete, "/collections/{0}/thngs/{2}"),
            op("removeAllThngs", "$id thngs delete", Delete, "/collections/{0}/thngs"),
        ],
    },
    ResourceGroup {
        first_args: &["products", "prod"],
        about: "Work with product resources.",
        operations: &[
            create("createProduct", "/products"),
            op("listProducts", "list", Get, "/products"),
            op("readProduct", "$id read", Get, "/products/{0}"),
            op("updateProduct", "$id update $payload", Put, "/products/{0}"),
            op("deleteProduct", "$id delete", Delete, "/products/{0}"),
            op("createProductProperties", "$id properties create $payload", Post, "/products/{0}/properties"),
            op("listProductProperties", "$id properties list", Get, "/products/{0}/properties"),
            op("readProductProperty", "$id properties $key read", Get, "/products/{0}/properties/{2}"),
            op("deleteProductProperty", "$id properties $key delete", Delete, "/products/{0}/properties/{2}"),
            op("createProductAction", "$id actions create $payload", Post, "/products/{0}/actions/all"),
            op("listProductActions", "$id actions list", Get, "/products/{0}/actions/all"),
            op("readProductAction", "$id actions $id read", Get, "/products/{0}/actions/all/{2}"),
        ],
    },
    ResourceGroup {
        first_args: &["projects"],
        about: "Work with project and application resources.",
        operations: &[
            create("createProject", "/projects"),
            op("listProjects", "list", Get, "/projects"),
            op("readProject", "$id read", Get, "/projects/{0}"),
            op("updateProject", "$id update $payload", Put, "/projects/{0}"),
            op("deleteProject", "$id delete", Delete, "/projects/{0}"),
            op("createApplication", "$id applications create $payload", Post, "/projects/{0}/applications"),
            op("listApplications", "$id applications list", Get, "/projects/{0}/applications"),
            op("readApplication", "$id applications $id read", Get, "/projects/{0}/applications/{2}"),
            op("updateApplication", "$id applications $id update $payload", Put, "/projects/{0}/applications/{2}"),
            op("deleteApplication", "$id applications $id delete", Delete, "/projects/{0}/applications/{2}"),
        ],
    },
    ResourceGroup {
        first_args: &["shipment-notices", "asn"],
        about: "Work with shipment notices.",
        operations: &[
            create("createShipmentNotice", "/shipmentNotices"),
            op("listShipmentNotices", "list", Get, "/shipmentNotices"),
            op("readShipmentNotice", "$id read", Get, "/shipmentNotices/{0}"),
            op("updateShipmentNotice", "$id update $payload", Put, "/shipmentNotices/{0}"),
            op("deleteShipmentNotice", "$id delete", Delete, "/shipmentNotices/{0}"),
        ],
    },
    ResourceGroup {
        first_args: &["thngs", "t"],
        about: "Work with Thng resources.",
        operations: &[
            create("createThng", "/thngs"),
            op("listThngs", "list", Get, "/thngs"),
            op("readThng", "$id read", Get, "/thngs/{0}"),
            op("updateThng", "$id update $payload", Put, "/thngs/{0}"),
            op("deleteThng", "$id delete", Delete, "/thngs/{0}"),
            op("createThngProperties", "$id properties create $payload", Post, "/thngs/{0}/properties"),
            op("listThngProperties", "$id properties list", Get, "/thngs/{0}/properties"),
            op("readThngProperty", "$id properties $key read", Get, "/thngs/{0}/properties/{2}"),
            op("deleteThngProperty", "$id properties $key delete", Delete, "/thngs/{0}/properties/{2}"),
            op("createThngAction", "$id actions create $payload", Post, "/thngs/{0}/actions/all"),
            op("listThngActions", "$id actions list", Get, "/thngs/{0}/actions/all"),
            op("readThngAction", "$id actions $id read", Get, "/thngs/{0}/actions/all/{2}"),
            op("readThngLocation", "$id location read", Get, "/thngs/{0}/location"),
            op("updateThngLocation", "$id location update $payload", Put, "/thngs/{0}/location"),
            op("deleteThngLocation", "$id location delete", Delete, "/thngs/{0}/location"),
        ],
    },
];

/// Compiles the built-in catalog.
pub fn builtin_registry() -> Result<Registry, RegistryError> {
    Registry::compile(RESOURCE_GROUPS)
}
