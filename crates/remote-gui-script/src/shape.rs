/// How a generated method call marshals its arguments and result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallShape {
    /// Scalar arguments in, scalar result out. No validation.
    Plain {
        params: &'static [&'static str],
        returns: bool,
    },
    /// The argument is an id resolved to a runtime value before the call.
    RefSetter,
    /// The result is a runtime object, reverse-resolved to its id.
    RefGetter,
    /// Like [`CallShape::RefSetter`] with a trailing 1-based index.
    RefInsert,
    /// Like [`CallShape::RefGetter`] with a 1-based index argument.
    RefAt,
    /// The method returns several values, packed into one keyed table.
    MultiGet { names: &'static [&'static str] },
    /// The method returns a list of runtime objects, each mapped to its id.
    RefArray,
    /// The argument is a color name or the id of a color object.
    ColorSetter,
    /// The argument is clipboard data whose image payload is an id.
    ClipboardSetter,
}

impl CallShape {
    pub fn params(&self) -> &'static [&'static str] {
        match self {
            CallShape::Plain { params, .. } => *params,
            CallShape::RefSetter => &["id"],
            CallShape::RefGetter | CallShape::MultiGet { .. } => &[],
            CallShape::RefInsert => &["id", "index"],
            CallShape::RefAt => &["index"],
            CallShape::RefArray => &["..."],
            CallShape::ColorSetter => &["color"],
            CallShape::ClipboardSetter => &["data", "operations"],
        }
    }

    /// Whether the generated script checks that the method exists before calling it.
    pub fn checks_method(&self) -> bool {
        !matches!(self, CallShape::Plain { .. })
    }

    /// Whether the result is an id (or list of ids) to be resolved through the registry.
    pub fn returns_ref(&self) -> bool {
        matches!(
            self,
            CallShape::RefGetter | CallShape::RefAt | CallShape::RefArray
        )
    }
}

/// One entry of an element type's static method table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: &'static str,
    pub shape: CallShape,
}

impl MethodDecl {
    /// A plain call returning the method's result.
    pub const fn getter(name: &'static str, params: &'static [&'static str]) -> Self {
        Self {
            name,
            shape: CallShape::Plain {
                params,
                returns: true,
            },
        }
    }

    /// A plain call whose result is discarded.
    pub const fn action(name: &'static str, params: &'static [&'static str]) -> Self {
        Self {
            name,
            shape: CallShape::Plain {
                params,
                returns: false,
            },
        }
    }

    pub const fn ref_setter(name: &'static str) -> Self {
        Self {
            name,
            shape: CallShape::RefSetter,
        }
    }

    pub const fn ref_getter(name: &'static str) -> Self {
        Self {
            name,
            shape: CallShape::RefGetter,
        }
    }

    pub const fn ref_insert(name: &'static str) -> Self {
        Self {
            name,
            shape: CallShape::RefInsert,
        }
    }

    pub const fn ref_at(name: &'static str) -> Self {
        Self {
            name,
            shape: CallShape::RefAt,
        }
    }

    pub const fn multi_get(name: &'static str, names: &'static [&'static str]) -> Self {
        Self {
            name,
            shape: CallShape::MultiGet { names },
        }
    }

    pub const fn ref_array(name: &'static str) -> Self {
        Self {
            name,
            shape: CallShape::RefArray,
        }
    }

    pub const fn color_setter(name: &'static str) -> Self {
        Self {
            name,
            shape: CallShape::ColorSetter,
        }
    }

    pub const fn clipboard_setter(name: &'static str) -> Self {
        Self {
            name,
            shape: CallShape::ClipboardSetter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_per_shape() {
        assert_eq!(MethodDecl::ref_insert("insert").shape.params(), ["id", "index"]);
        assert_eq!(MethodDecl::ref_at("itemat").shape.params(), ["index"]);
        assert!(MethodDecl::multi_get("getsizeconstraints", &["minsize", "maxsize"])
            .shape
            .params()
            .is_empty());
        assert_eq!(
            MethodDecl::action("setsizeconstraints", &["minsize", "maxsize"])
                .shape
                .params(),
            ["minsize", "maxsize"]
        );
    }

    #[test]
    fn test_plain_calls_skip_method_check() {
        assert!(!MethodDecl::getter("getname", &[]).shape.checks_method());
        assert!(MethodDecl::ref_getter("getsubmenu").shape.checks_method());
        assert!(MethodDecl::ref_array("getchildwindows").shape.returns_ref());
        assert!(!MethodDecl::color_setter("setcolor").shape.returns_ref());
    }
}
