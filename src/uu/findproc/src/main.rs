// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

fn main() {
    std::process::exit(uu_findproc::uumain(uucore::args_os()));
}
