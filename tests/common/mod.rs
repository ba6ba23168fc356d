//! Shared test fixtures: a service with three resources exercising every
//! lifecycle and trait combination the derivation engine handles.

#![allow(dead_code)]

use resource_schema::{ConverterConfig, Model};
use serde_json::json;

/// A service with three annotated resources:
///
/// - `FooResource`: create/read/update lifecycles, no put, explicit
///   mutability traits on several members.
/// - `BarResource` (named `Bar`): put lifecycle, an additional identifier on
///   the read input, an additional schema with an excluded member, and a
///   nested child resource.
/// - `BazResource` (named `Basil`): two identifiers, implicit mutability
///   from create/read/update only.
pub fn test_model() -> Model {
    serde_json::from_value(json!({
        "shapes": {
            "smithy.example#TestService": {
                "type": "service",
                "version": "2026-08-02",
                "resources": ["smithy.example#FooResource", "smithy.example#BarResource"]
            },

            "smithy.example#FooResource": {
                "type": "resource",
                "identifiers": { "fooId": "smithy.example#FooId" },
                "create": "smithy.example#CreateFoo",
                "read": "smithy.example#GetFoo",
                "update": "smithy.example#UpdateFoo",
                "traits": {
                    "provision#resource": {},
                    "api#documentation": "A Foo resource.",
                    "api#externalDocumentation": {
                        "Documentation Url": "https://docs.example.com/foo",
                        "Source Url": "https://source.example.com/foo"
                    }
                }
            },
            "smithy.example#CreateFoo": {
                "type": "operation",
                "input": "smithy.example#CreateFooRequest"
            },
            "smithy.example#CreateFooRequest": {
                "type": "structure",
                "members": {
                    "fooValidCreateProperty": {
                        "target": "smithy.example#PropertyValue",
                        "traits": { "provision#createOnlyProperty": {} }
                    }
                }
            },
            "smithy.example#GetFoo": {
                "type": "operation",
                "input": "smithy.example#GetFooRequest",
                "output": "smithy.example#GetFooResponse"
            },
            "smithy.example#GetFooRequest": {
                "type": "structure",
                "members": {
                    "fooId": { "target": "smithy.example#FooId" }
                }
            },
            "smithy.example#GetFooResponse": {
                "type": "structure",
                "members": {
                    "fooId": { "target": "smithy.example#FooId" },
                    "fooValidReadProperty": {
                        "target": "smithy.example#PropertyValue",
                        "traits": { "provision#readOnlyProperty": {} }
                    },
                    "fooValidFullyMutableProperty": {
                        "target": "smithy.example#PropertyValue"
                    }
                }
            },
            "smithy.example#UpdateFoo": {
                "type": "operation",
                "input": "smithy.example#UpdateFooRequest"
            },
            "smithy.example#UpdateFooRequest": {
                "type": "structure",
                "members": {
                    "fooId": { "target": "smithy.example#FooId" },
                    "fooValidWriteProperty": {
                        "target": "smithy.example#PropertyValue",
                        "traits": { "provision#writeOnlyProperty": {} }
                    },
                    "fooValidFullyMutableProperty": {
                        "target": "smithy.example#PropertyValue"
                    }
                }
            },

            "smithy.example#BarResource": {
                "type": "resource",
                "identifiers": { "barId": "smithy.example#BarId" },
                "put": "smithy.example#PutBar",
                "read": "smithy.example#GetBar",
                "resources": ["smithy.example#BazResource"],
                "traits": {
                    "provision#resource": {
                        "name": "Bar",
                        "additionalSchemas": ["smithy.example#BarAttributes"]
                    },
                    "api#documentation": "A Bar resource."
                }
            },
            "smithy.example#PutBar": {
                "type": "operation",
                "input": "smithy.example#PutBarRequest"
            },
            "smithy.example#PutBarRequest": {
                "type": "structure",
                "members": {
                    "barId": { "target": "smithy.example#BarId" },
                    "barImplicitWriteProperty": {
                        "target": "smithy.example#PropertyValue"
                    }
                }
            },
            "smithy.example#GetBar": {
                "type": "operation",
                "input": "smithy.example#GetBarRequest",
                "output": "smithy.example#GetBarResponse"
            },
            "smithy.example#GetBarRequest": {
                "type": "structure",
                "members": {
                    "barId": { "target": "smithy.example#BarId" },
                    "arn": {
                        "target": "smithy.example#Arn",
                        "traits": { "provision#additionalIdentifier": {} }
                    }
                }
            },
            "smithy.example#GetBarResponse": {
                "type": "structure",
                "members": {
                    "barImplicitReadProperty": {
                        "target": "smithy.example#PropertyValue"
                    }
                }
            },
            "smithy.example#BarAttributes": {
                "type": "structure",
                "members": {
                    "barValidAdditionalProperty": {
                        "target": "smithy.example#PropertyValue"
                    },
                    "barValidExcludedProperty": {
                        "target": "smithy.example#PropertyValue",
                        "traits": { "provision#excludeProperty": {} }
                    }
                }
            },

            "smithy.example#BazResource": {
                "type": "resource",
                "identifiers": {
                    "barId": "smithy.example#BarId",
                    "bazId": "smithy.example#BazId"
                },
                "create": "smithy.example#CreateBaz",
                "read": "smithy.example#GetBaz",
                "update": "smithy.example#UpdateBaz",
                "traits": {
                    "provision#resource": { "name": "Basil" },
                    "api#documentation": "A Baz resource."
                }
            },
            "smithy.example#CreateBaz": {
                "type": "operation",
                "input": "smithy.example#CreateBazRequest"
            },
            "smithy.example#CreateBazRequest": {
                "type": "structure",
                "members": {
                    "bazImplicitCreateProperty": {
                        "target": "smithy.example#PropertyValue"
                    }
                }
            },
            "smithy.example#GetBaz": {
                "type": "operation",
                "input": "smithy.example#GetBazRequest",
                "output": "smithy.example#GetBazResponse"
            },
            "smithy.example#GetBazRequest": {
                "type": "structure",
                "members": {
                    "barId": { "target": "smithy.example#BarId" },
                    "bazId": { "target": "smithy.example#BazId" }
                }
            },
            "smithy.example#GetBazResponse": {
                "type": "structure",
                "members": {
                    "bazImplicitReadProperty": {
                        "target": "smithy.example#PropertyValue"
                    },
                    "bazImplicitFullyMutableProperty": {
                        "target": "smithy.example#PropertyValue"
                    }
                }
            },
            "smithy.example#UpdateBaz": {
                "type": "operation",
                "input": "smithy.example#UpdateBazRequest"
            },
            "smithy.example#UpdateBazRequest": {
                "type": "structure",
                "members": {
                    "barId": { "target": "smithy.example#BarId" },
                    "bazId": { "target": "smithy.example#BazId" },
                    "bazImplicitWriteProperty": {
                        "target": "smithy.example#PropertyValue"
                    },
                    "bazImplicitFullyMutableProperty": {
                        "target": "smithy.example#PropertyValue"
                    }
                }
            },

            "smithy.example#FooId": { "type": "string" },
            "smithy.example#BarId": { "type": "string" },
            "smithy.example#BazId": { "type": "string" },
            "smithy.example#Arn": { "type": "string" },
            "smithy.example#PropertyValue": { "type": "string" }
        }
    }))
    .unwrap()
}

/// A config pointing at the test service.
pub fn test_config() -> ConverterConfig {
    serde_json::from_value(json!({
        "organizationName": "Smithy",
        "service": "smithy.example#TestService"
    }))
    .unwrap()
}
