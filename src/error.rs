//! Errors for meta-tree construction.

use std::io;
use std::path::PathBuf;

use error_chain::error_chain;

error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }

    foreign_links {
        Io(io::Error);
    }

    errors {
        /// A path component could not be decoded to UTF-8.
        BadFilename(component: String) {
            description("path component is not valid UTF-8")
            display("path component is not valid UTF-8: {:?}", component)
        }

        /// A filesystem entry is neither a regular file nor a directory.
        UnsupportedEntry(location: PathBuf) {
            description("unsupported filesystem entry")
            display("unsupported filesystem entry at {}", location.display())
        }

        /// The assembled info dictionary failed metainfo validation.
        InvalidMetainfo(reason: String) {
            description("assembled metainfo failed validation")
            display("invalid metainfo: {}", reason)
        }

        /// The announce URL given on the command line does not parse.
        BadAnnounceUrl(url: String) {
            description("announce url does not parse")
            display("announce url does not parse: {:?}", url)
        }
    }
}
