mod i_type;
mod j_type;
mod r_type;
mod syscall;
