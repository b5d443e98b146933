//! Shared test fixtures.

use std::fs;
use std::path::{Path, PathBuf};

/// A reduced copy of the React type declarations.
pub const REACT_TYPES: &str = r#"
export = React;
export as namespace React;

declare namespace React {
    type ReactNode = string | number | boolean | null | undefined;
    type SFC<P = {}> = StatelessComponent<P>;

    interface StatelessComponent<P = {}> {
        (props: P & { children?: ReactNode }, context?: any): any;
        displayName?: string;
    }

    interface ComponentClass<P = {}> {
        new (props: P, context?: any): Component<P, any>;
        displayName?: string;
    }

    class Component<P, S> {
        constructor(props: P, context?: any);
        setState(state: S): void;
        render(): ReactNode;
        readonly props: Readonly<{ children?: ReactNode }> & Readonly<P>;
        state: Readonly<S>;
    }

    class PureComponent<P = {}, S = {}> extends Component<P, S> {}
}
"#;

/// Write `text` to `root/rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, text: &str) -> std::io::Result<PathBuf> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, text)?;
    Ok(path)
}

/// Install the React declarations under `root/node_modules/@types/react`.
pub fn install_react(root: &Path) -> std::io::Result<PathBuf> {
    write(root, "node_modules/@types/react/index.d.ts", REACT_TYPES)
}
