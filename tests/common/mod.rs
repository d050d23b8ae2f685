//! A fake GUI library on top of `LocalRuntime`, shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::ops::Deref;
use std::rc::Rc;

use remote_gui::components::scripts;
use remote_gui::{
    Construction, Element, ElementKind, LocalRuntime, MethodDecl, RemoteElement, Session,
    SessionConfig,
};
use remote_gui_runtime::{Class, LocalObject, LocalValue, Scope};

type NativeResult = Result<Vec<LocalValue>, String>;

fn first(args: Vec<LocalValue>) -> LocalValue {
    args.into_iter().next().unwrap_or_default()
}

fn set(field: &'static str) -> impl Fn(&Rc<LocalObject>, Vec<LocalValue>) -> NativeResult {
    move |obj, args| {
        obj.set_field(field, first(args));
        Ok(vec![])
    }
}

fn get(field: &'static str) -> impl Fn(&Rc<LocalObject>, Vec<LocalValue>) -> NativeResult {
    move |obj, _| Ok(vec![obj.field(field)])
}

fn items(obj: &LocalObject) -> Vec<LocalValue> {
    match obj.field("items") {
        LocalValue::List(items) => items,
        _ => Vec::new(),
    }
}

fn size(width: f64, height: f64) -> LocalValue {
    LocalValue::Table(
        [
            ("width".to_string(), LocalValue::from(width)),
            ("height".to_string(), LocalValue::from(height)),
        ]
        .into_iter()
        .collect(),
    )
}

fn same(a: &LocalValue, b: &LocalValue) -> bool {
    match (a.as_object(), b.as_object()) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

fn menu_class(name: &str) -> Rc<Class> {
    Rc::new(
        Class::new(name)
            .method("append", |menu, args| {
                let mut list = items(menu);
                list.push(first(args));
                menu.set_field("items", LocalValue::List(list));
                Ok(vec![])
            })
            .method("insert", |menu, args| {
                let mut args = args.into_iter();
                let item = args.next().unwrap_or_default();
                let index = args.next().and_then(|i| i.as_f64()).unwrap_or(1.0) as usize;
                let mut list = items(menu);
                let at = index.saturating_sub(1).min(list.len());
                list.insert(at, item);
                menu.set_field("items", LocalValue::List(list));
                Ok(vec![])
            })
            .method("remove", |menu, args| {
                let item = first(args);
                let list = items(menu).into_iter().filter(|i| !same(i, &item)).collect();
                menu.set_field("items", LocalValue::List(list));
                Ok(vec![])
            })
            .method("itemcount", |menu, _| {
                Ok(vec![LocalValue::from(items(menu).len() as f64)])
            })
            .method("itemat", |menu, args| {
                let index = first(args).as_f64().unwrap_or(0.0) as usize;
                let item = index
                    .checked_sub(1)
                    .and_then(|i| items(menu).get(i).cloned())
                    .unwrap_or_default();
                Ok(vec![item])
            })
            .method("popup", |menu, _| {
                menu.set_field("popped", LocalValue::from(true));
                Ok(vec![])
            }),
    )
}

fn window_class() -> Rc<Class> {
    Rc::new(
        Class::new("Window")
            .method("close", |window, _| {
                window.emit("close", vec![]);
                Ok(vec![])
            })
            .method("settitle", set("title"))
            .method("gettitle", get("title"))
            .method("setvisible", set("visible"))
            .method("isvisible", get("visible"))
            .method("setcontentview", |window, args| {
                let view = first(args);
                if let Some(object) = view.as_object() {
                    object.set_field("window", LocalValue::Object(Rc::clone(window)));
                }
                window.set_field("contentview", view);
                Ok(vec![])
            })
            .method("getcontentview", get("contentview"))
            .method("setsizeconstraints", |window, args| {
                let mut args = args.into_iter();
                window.set_field("minsize", args.next().unwrap_or_default());
                window.set_field("maxsize", args.next().unwrap_or_default());
                Ok(vec![])
            })
            .method("getsizeconstraints", |window, _| {
                Ok(vec![window.field("minsize"), window.field("maxsize")])
            })
            .method("addchildwindow", |window, args| {
                let child = first(args);
                if let Some(object) = child.as_object() {
                    object.set_field("parent", LocalValue::Object(Rc::clone(window)));
                }
                let mut children = match window.field("children") {
                    LocalValue::List(children) => children,
                    _ => Vec::new(),
                };
                children.push(child);
                window.set_field("children", LocalValue::List(children));
                Ok(vec![])
            })
            .method("getchildwindows", |window, _| match window.field("children") {
                LocalValue::List(children) => Ok(vec![LocalValue::List(children)]),
                _ => Ok(vec![LocalValue::List(Vec::new())]),
            })
            .method("getparentwindow", get("parent"))
            .method("setbackgroundcolor", set("background"))
            .method("setmenubar", set("menubar"))
            .method("getmenubar", get("menubar")),
    )
}

fn view_class() -> Rc<Class> {
    Rc::new(
        Class::new("Container")
            .method("setvisible", set("visible"))
            .method("isvisible", get("visible"))
            .method("getparent", get("parent"))
            .method("getwindow", get("window"))
            .method("setcolor", set("color"))
            .method("setbackgroundcolor", set("background"))
            .method("dodrag", |view, args| {
                view.set_field("dragged", first(args));
                Ok(vec![LocalValue::from(1.0)])
            }),
    )
}

fn menu_item_class() -> Rc<Class> {
    Rc::new(
        Class::new("MenuItem")
            .method("click", |item, _| {
                item.emit("click", vec![LocalValue::from("clicked")]);
                Ok(vec![])
            })
            .method("setlabel", set("label"))
            .method("getlabel", get("label"))
            .method("setsubmenu", set("submenu"))
            .method("getsubmenu", get("submenu"))
            .method("setchecked", set("checked"))
            .method("ischecked", get("checked"))
            .method("setimage", set("image"))
            .method("getimage", get("image")),
    )
}

fn font_class() -> Rc<Class> {
    Rc::new(
        Class::new("Font")
            .method("getname", get("name"))
            .method("getsize", get("size"))
            .method("getweight", get("weight"))
            .method("getstyle", get("style")),
    )
}

fn new_font(class: &Rc<Class>, name: &str, size: f64, weight: &str, style: &str) -> LocalValue {
    let font = class.instantiate();
    font.set_field("name", LocalValue::from(name));
    font.set_field("size", LocalValue::from(size));
    font.set_field("weight", LocalValue::from(weight));
    font.set_field("style", LocalValue::from(style));
    LocalValue::Object(font)
}

fn construct_menu(class: &Rc<Class>, scope: &Scope<'_>, args: Vec<LocalValue>) -> Result<LocalValue, String> {
    let ids = match first(args) {
        LocalValue::List(ids) => ids,
        _ => Vec::new(),
    };
    let list = ids
        .iter()
        .map(|id| scope.lookup(id.as_str().unwrap_or_default()).unwrap_or_default())
        .collect();
    let menu = class.instantiate();
    menu.set_field("items", LocalValue::List(list));
    Ok(LocalValue::Object(menu))
}

/// A runtime answering every construction body of the catalogue.
pub fn fake_gui() -> Rc<LocalRuntime> {
    let runtime = LocalRuntime::new();

    let window = window_class();
    runtime.define(scripts::WINDOW_CREATE, move |_, args| {
        let object = window.instantiate();
        object.set_field("options", first(args));
        object.set_field("title", LocalValue::from(""));
        object.set_field("visible", LocalValue::from(false));
        Ok(LocalValue::Object(object))
    });

    let view = view_class();
    runtime.define(scripts::CONTAINER_CREATE, move |_, _| {
        Ok(LocalValue::Object(view.instantiate()))
    });

    let color = Rc::new(Class::new("Color"));
    let theme = Rc::new(Class::new("Color")).instantiate();
    runtime.define(scripts::COLOR_GET, move |_, _| Ok(LocalValue::Object(Rc::clone(&theme))));
    let rgb = Rc::clone(&color);
    runtime.define(scripts::COLOR_RGB, move |_, _| Ok(LocalValue::Object(rgb.instantiate())));
    runtime.define(scripts::COLOR_ARGB, move |_, _| Ok(LocalValue::Object(color.instantiate())));

    let font = font_class();
    let default_font = Rc::clone(&font);
    runtime.define(scripts::FONT_DEFAULT, move |_, _| {
        Ok(new_font(&default_font, "Sans", 12.0, "normal", "normal"))
    });
    let named_font = Rc::clone(&font);
    runtime.define(scripts::FONT_CREATE, move |_, args| {
        let name = args.first().and_then(|v| v.as_str()).unwrap_or_default().to_string();
        let size = args.get(1).and_then(|v| v.as_f64()).unwrap_or_default();
        let weight = args.get(2).and_then(|v| v.as_str()).unwrap_or("normal").to_string();
        let style = args.get(3).and_then(|v| v.as_str()).unwrap_or("normal").to_string();
        Ok(new_font(&named_font, &name, size, &weight, &style))
    });
    runtime.define(scripts::FONT_CREATE_FROM_PATH, |_, _| Err("file not found".into()));
    runtime.define(scripts::FONT_DERIVE, move |scope, args| {
        let parent_id = args.first().and_then(|v| v.as_str()).unwrap_or_default().to_string();
        let parent = scope.object(&parent_id)?;
        let delta = args.get(1).and_then(|v| v.as_f64()).unwrap_or_default();
        let weight = args.get(2).and_then(|v| v.as_str()).unwrap_or("normal").to_string();
        let style = args.get(3).and_then(|v| v.as_str()).unwrap_or("normal").to_string();
        let name = parent.field("name").as_str().unwrap_or_default().to_string();
        let size = parent.field("size").as_f64().unwrap_or_default() + delta;
        Ok(new_font(&font, &name, size, &weight, &style))
    });

    let image = Rc::new(
        Class::new("Image")
            .method("getsize", |_, _| Ok(vec![size(16.0, 16.0)]))
            .method("getscalefactor", get("scalefactor")),
    );
    let empty = Rc::clone(&image);
    runtime.define(scripts::IMAGE_CREATE_EMPTY, move |_, _| {
        let object = empty.instantiate();
        object.set_field("scalefactor", LocalValue::from(1.0));
        Ok(LocalValue::Object(object))
    });
    runtime.define(scripts::IMAGE_CREATE_FROM_BUFFER, move |_, args| {
        let object = image.instantiate();
        object.set_field("scalefactor", args.get(1).cloned().unwrap_or_default());
        Ok(LocalValue::Object(object))
    });

    let item = menu_item_class();
    let typed = Rc::clone(&item);
    runtime.define(scripts::MENU_ITEM_CREATE_TYPE, move |_, args| {
        let object = typed.instantiate();
        object.set_field("type", first(args));
        Ok(LocalValue::Object(object))
    });
    runtime.define(scripts::MENU_ITEM_CREATE_OPTIONS, move |_, args| {
        let options = first(args);
        let object = item.instantiate();
        object.set_field("label", options.get("label"));
        object.set_field("type", options.get("type"));
        Ok(LocalValue::Object(object))
    });

    let menu = menu_class("Menu");
    runtime.define(scripts::MENU_CREATE, move |scope, args| construct_menu(&menu, scope, args));
    let menubar = menu_class("MenuBar");
    runtime.define(scripts::MENU_BAR_CREATE, move |scope, args| {
        construct_menu(&menubar, scope, args)
    });

    let app = Rc::new(
        Class::new("App")
            .method("setname", set("name"))
            .method("getname", get("name")),
    )
    .instantiate();
    runtime.define(scripts::APP, move |_, _| Ok(LocalValue::Object(Rc::clone(&app))));

    define_probe(&runtime);
    Rc::new(runtime)
}

pub async fn connect(runtime: &Rc<LocalRuntime>) -> Session {
    Session::connect(runtime.clone(), SessionConfig::default())
        .await
        .expect("connect")
}

pub const PROBE_CREATE: &str = "return probe.create(value)";
pub const SCALAR_CREATE: &str = "return 42";
pub const FAILING_CREATE: &str = "error('boom')";

pub static PROBE: ElementKind = ElementKind {
    name: "Probe",
    own_events: &["ping"],
    own_methods: &[
        MethodDecl::ref_getter("getself"),
        MethodDecl::ref_getter("getstranger"),
        MethodDecl::ref_getter("getnothing"),
        MethodDecl::ref_array("getfamily"),
        MethodDecl::getter("getvalue", &[]),
        MethodDecl::action("setvalue", &["value"]),
        MethodDecl::ref_setter("adopt"),
        // Declared, but the backing class does not implement them.
        MethodDecl::ref_setter("disown"),
        MethodDecl::action("explode", &[]),
    ],
    parent: None,
};

pub static SCALAR: ElementKind = ElementKind {
    name: "Scalar",
    own_events: &[],
    own_methods: &[MethodDecl::getter("getvalue", &[])],
    parent: None,
};

/// A test element whose backing object can hand itself back.
#[derive(Debug)]
pub struct Probe {
    remote: RemoteElement,
}

impl Element for Probe {
    const KIND: &'static ElementKind = &PROBE;

    fn remote(&self) -> &RemoteElement {
        &self.remote
    }
}

impl Deref for Probe {
    type Target = RemoteElement;

    fn deref(&self) -> &RemoteElement {
        &self.remote
    }
}

impl Probe {
    pub fn new(session: &Session, value: f64) -> Rc<Probe> {
        Self::with_body(session, Construction::new(PROBE_CREATE, &["value"], vec![value.into()]))
    }

    pub fn with_body(session: &Session, construction: Construction) -> Rc<Probe> {
        RemoteElement::construct(session, construction, |remote| Probe { remote })
    }
}

#[derive(Debug)]
pub struct Scalar {
    remote: RemoteElement,
}

impl Element for Scalar {
    const KIND: &'static ElementKind = &SCALAR;

    fn remote(&self) -> &RemoteElement {
        &self.remote
    }
}

impl Scalar {
    pub fn new(session: &Session) -> Rc<Scalar> {
        RemoteElement::construct(session, Construction::script(SCALAR_CREATE), |remote| Scalar {
            remote,
        })
    }
}

thread_local! {
    /// How many times the probe constructor ran on this thread.
    pub static PROBES_BUILT: Cell<u32> = const { Cell::new(0) };
}

fn define_probe(runtime: &LocalRuntime) {
    let class = Rc::new(
        Class::new("Probe")
            .method("getself", |obj, _| Ok(vec![LocalValue::Object(Rc::clone(obj))]))
            .method("getstranger", get("stranger"))
            .method("getnothing", |_, _| Ok(vec![LocalValue::Nil]))
            .method("getfamily", get("family"))
            .method("getvalue", get("value"))
            .method("setvalue", set("value"))
            .method("adopt", set("adopted")),
    );
    runtime.define(PROBE_CREATE, move |_, args| {
        PROBES_BUILT.with(|built| built.set(built.get() + 1));
        let probe = class.instantiate();
        probe.set_field("value", first(args));
        Ok(LocalValue::Object(probe))
    });
    runtime.define(SCALAR_CREATE, |_, _| Ok(LocalValue::from(42.0)));
    runtime.define(FAILING_CREATE, |_, _| Err("boom".into()));
}
